#![allow(dead_code, unused_imports)]

pub(crate) mod fake_az;
pub(crate) mod test_context;

pub(crate) use manifest::{DEV_NAMES, REPORTING_MANIFEST};
pub(crate) use test_context::{DEV_GROUP, TestContext};
