//! Azure CLI argument construction.
//!
//! Pure functions from resources to `az` argv vectors. Execution lives in
//! `az_command`; keeping construction separate lets dry runs and tests show
//! the exact commands without running them.

use crate::domain::{AppError, ResolvedResource, ResourceDescriptor, ResourceKind};

pub(crate) fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

fn parent_of<'a>(descriptor: &'a ResourceDescriptor) -> Result<&'a str, AppError> {
    descriptor.parent.as_deref().ok_or_else(|| {
        AppError::manifest(format!("{} '{}' has no parent", descriptor.kind, descriptor.role))
    })
}

fn required<'a>(resource: &'a ResolvedResource, key: &str) -> Result<&'a str, AppError> {
    resource.property(key).ok_or_else(|| {
        AppError::manifest(format!(
            "'{}' ({}) is missing property '{}'",
            resource.descriptor.role, resource.descriptor.kind, key
        ))
    })
}

fn reference<'a>(
    resource: &'a ResolvedResource,
    key: &str,
) -> Result<&'a ResourceDescriptor, AppError> {
    resource.reference(key).ok_or_else(|| {
        AppError::manifest(format!(
            "'{}' ({}) does not reference a '{}'",
            resource.descriptor.role, resource.descriptor.kind, key
        ))
    })
}

fn public_access_disabled(resource: &ResolvedResource) -> bool {
    resource.property("public_network_access").is_none_or(|v| v.eq_ignore_ascii_case("disabled"))
}

/// Subcommand path with a `{}` verb slot, plus the flags that locate the resource.
fn scope(descriptor: &ResourceDescriptor) -> Result<Vec<String>, AppError> {
    let rg = descriptor.resource_group.as_str();
    let name = descriptor.name.as_str();
    Ok(match descriptor.kind {
        ResourceKind::VirtualNetwork => args(&["network", "vnet", "{}", "-g", rg, "-n", name]),
        ResourceKind::Subnet => args(&[
            "network",
            "vnet",
            "subnet",
            "{}",
            "-g",
            rg,
            "--vnet-name",
            parent_of(descriptor)?,
            "-n",
            name,
        ]),
        ResourceKind::NetworkSecurityGroup => {
            args(&["network", "nsg", "{}", "-g", rg, "-n", name])
        }
        ResourceKind::AppServicePlan => args(&["appservice", "plan", "{}", "-g", rg, "-n", name]),
        ResourceKind::WebApp => args(&["webapp", "{}", "-g", rg, "-n", name]),
        ResourceKind::SqlServer => args(&["sql", "server", "{}", "-g", rg, "-n", name]),
        ResourceKind::SqlDatabase => {
            args(&["sql", "db", "{}", "-g", rg, "--server", parent_of(descriptor)?, "-n", name])
        }
        ResourceKind::KeyVault => args(&["keyvault", "{}", "-g", rg, "-n", name]),
        ResourceKind::StorageAccount => args(&["storage", "account", "{}", "-g", rg, "-n", name]),
        ResourceKind::PrivateEndpoint => {
            args(&["network", "private-endpoint", "{}", "-g", rg, "-n", name])
        }
        ResourceKind::TemplateDeployment => {
            args(&["deployment", "group", "{}", "-g", rg, "-n", name])
        }
    })
}

fn with_verb(mut scoped: Vec<String>, verb: &str) -> Vec<String> {
    if let Some(slot) = scoped.iter_mut().find(|part| part.as_str() == "{}") {
        *slot = verb.to_string();
    }
    scoped
}

/// `show` command used for existence checks.
pub fn show(descriptor: &ResourceDescriptor) -> Result<Vec<String>, AppError> {
    Ok(with_verb(scope(descriptor)?, "show"))
}

/// `show` narrowed to the resource id.
pub fn show_id(descriptor: &ResourceDescriptor) -> Result<Vec<String>, AppError> {
    let mut argv = show(descriptor)?;
    argv.extend(args(&["--query", "id", "-o", "tsv"]));
    Ok(argv)
}

/// Commands that bring `resource` into existence, in execution order.
///
/// `target_id` is the provider id of the private-link target and is only
/// consulted for private endpoints.
pub fn create(
    resource: &ResolvedResource,
    target_id: Option<&str>,
) -> Result<Vec<Vec<String>>, AppError> {
    let descriptor = &resource.descriptor;
    let rg = descriptor.resource_group.as_str();
    let name = descriptor.name.as_str();
    let location = resource.location.as_str();
    let mut primary = with_verb(scope(descriptor)?, "create");
    let mut follow_up: Vec<Vec<String>> = Vec::new();

    match descriptor.kind {
        ResourceKind::VirtualNetwork => {
            let prefix = required(resource, "address_prefix")?;
            primary.extend(args(&["-l", location, "--address-prefixes", prefix]));
        }
        ResourceKind::Subnet => {
            primary.extend(args(&["--address-prefixes", required(resource, "address_prefix")?]));
            if let Some(nsg) = resource.reference("nsg") {
                primary.extend(args(&["--network-security-group", &nsg.name]));
            }
            if let Some(delegation) = resource.property("delegation") {
                primary.extend(args(&["--delegations", delegation]));
            }
            if let Some(policies) = resource.property("private_endpoint_network_policies") {
                primary.extend(args(&["--private-endpoint-network-policies", policies]));
            }
        }
        ResourceKind::NetworkSecurityGroup => {
            primary.extend(args(&["-l", location]));
            follow_up.extend(nsg_rules(resource)?);
        }
        ResourceKind::AppServicePlan => {
            let sku = resource.property("sku").unwrap_or("B1");
            primary.extend(args(&["-l", location, "--sku", sku]));
            if resource.property("os").is_none_or(|os| os.eq_ignore_ascii_case("linux")) {
                primary.push("--is-linux".to_string());
            }
        }
        ResourceKind::WebApp => {
            let plan = reference(resource, "plan")?;
            primary.extend(args(&["-p", &plan.name]));
            if let Some(runtime) = resource.property("runtime") {
                primary.extend(args(&["--runtime", runtime]));
            }
            follow_up
                .push(args(&["webapp", "update", "-g", rg, "-n", name, "--https-only", "true"]));
            follow_up.push(args(&[
                "webapp",
                "config",
                "set",
                "-g",
                rg,
                "-n",
                name,
                "--min-tls-version",
                "1.2",
                "--ftps-state",
                "Disabled",
            ]));
            if let Some(subnet) = resource.reference("subnet") {
                follow_up.push(args(&[
                    "webapp",
                    "vnet-integration",
                    "add",
                    "-g",
                    rg,
                    "-n",
                    name,
                    "--vnet",
                    parent_of(subnet)?,
                    "--subnet",
                    &subnet.name,
                ]));
            }
        }
        ResourceKind::SqlServer => {
            primary.extend(args(&[
                "-l",
                location,
                "--admin-user",
                required(resource, "admin_user")?,
                "--admin-password",
                required(resource, "admin_password")?,
                "--minimal-tls-version",
                "1.2",
            ]));
            if public_access_disabled(resource) {
                primary.extend(args(&["--enable-public-network", "false"]));
            }
        }
        ResourceKind::SqlDatabase => {
            primary.extend(args(&["--service-objective", resource.property("sku").unwrap_or("S0")]));
        }
        ResourceKind::KeyVault => {
            primary.extend(args(&["-l", location, "--enable-rbac-authorization", "true"]));
            if public_access_disabled(resource) {
                primary.extend(args(&["--public-network-access", "Disabled"]));
            }
        }
        ResourceKind::StorageAccount => {
            primary.extend(args(&[
                "-l",
                location,
                "--sku",
                resource.property("sku").unwrap_or("Standard_LRS"),
                "--kind",
                "StorageV2",
                "--https-only",
                "true",
                "--min-tls-version",
                "TLS1_2",
                "--allow-blob-public-access",
                "false",
            ]));
            if resource.property("public_network_access").is_some()
                && public_access_disabled(resource)
            {
                primary.extend(args(&["--public-network-access", "Disabled"]));
            }
        }
        ResourceKind::PrivateEndpoint => {
            let subnet = reference(resource, "subnet")?;
            let target_id = target_id.ok_or_else(|| {
                AppError::config_error(format!(
                    "Private endpoint '{}' needs the id of its target",
                    descriptor.role
                ))
            })?;
            primary.extend(args(&[
                "-l",
                location,
                "--vnet-name",
                parent_of(subnet)?,
                "--subnet",
                &subnet.name,
                "--private-connection-resource-id",
                target_id,
                "--group-id",
                required(resource, "group_id")?,
                "--connection-name",
                &format!("{}-conn", name),
            ]));
        }
        ResourceKind::TemplateDeployment => {
            primary.extend(args(&["--template-file", required(resource, "template")?]));
            if let Some(parameters) = resource.property("parameters") {
                primary.extend(args(&["--parameters", &format!("@{}", parameters)]));
            }
        }
    }

    if resource.wants_no_wait() {
        primary.push("--no-wait".to_string());
    }

    let mut commands = vec![primary];
    commands.extend(follow_up);
    Ok(commands)
}

/// One `nsg rule create` per inbound port.
fn nsg_rules(resource: &ResolvedResource) -> Result<Vec<Vec<String>>, AppError> {
    let descriptor = &resource.descriptor;
    Ok(resource
        .inbound_rules()?
        .into_iter()
        .map(|rule| {
            args(&[
                "network",
                "nsg",
                "rule",
                "create",
                "-g",
                &descriptor.resource_group,
                "--nsg-name",
                &descriptor.name,
                "-n",
                &format!("allow-inbound-{}", rule.port),
                "--priority",
                &rule.priority.to_string(),
                "--direction",
                "Inbound",
                "--access",
                "Allow",
                "--protocol",
                "Tcp",
                "--destination-port-ranges",
                &rule.port,
            ])
        })
        .collect())
}

/// Query for the ids of the resources a template deployment created.
pub fn deployment_outputs(descriptor: &ResourceDescriptor) -> Result<Vec<String>, AppError> {
    let mut argv = show(descriptor)?;
    argv.extend(args(&["--query", "properties.outputResources[].id"]));
    Ok(argv)
}

/// `resource delete` for provider ids, or `None` when there is nothing to delete.
pub fn delete_by_ids(ids: &[String]) -> Option<Vec<String>> {
    if ids.is_empty() {
        return None;
    }
    let mut argv = args(&["resource", "delete", "--ids"]);
    argv.extend(ids.iter().cloned());
    Some(argv)
}

/// Commands that remove `resource`, in execution order.
///
/// For a template deployment this only removes the deployment record; the
/// adapter deletes its output resources first.
pub fn delete(resource: &ResolvedResource) -> Result<Vec<Vec<String>>, AppError> {
    let descriptor = &resource.descriptor;
    let mut primary = with_verb(scope(descriptor)?, "delete");
    let mut follow_up = Vec::new();

    match descriptor.kind {
        ResourceKind::AppServicePlan
        | ResourceKind::SqlServer
        | ResourceKind::SqlDatabase
        | ResourceKind::StorageAccount => primary.push("--yes".to_string()),
        ResourceKind::WebApp => primary.push("--keep-empty-plan".to_string()),
        ResourceKind::KeyVault => {
            if resource.property("purge_on_delete").is_some_and(|v| v == "true") {
                follow_up.push(args(&[
                    "keyvault",
                    "purge",
                    "-n",
                    &descriptor.name,
                    "-l",
                    &resource.location,
                ]));
            }
        }
        _ => {}
    }

    if resource.wants_no_wait() {
        primary.push("--no-wait".to_string());
    }

    let mut commands = vec![primary];
    commands.extend(follow_up);
    Ok(commands)
}

/// Flags whose following value must never be printed or logged.
const SECRET_FLAGS: &[&str] = &["--admin-password", "--password", "--client-secret"];

/// Render an argv for display with secret values masked.
pub fn redacted(argv: &[String]) -> String {
    let mut parts = Vec::with_capacity(argv.len() + 1);
    parts.push("az");
    let mut mask_next = false;
    for part in argv {
        if mask_next {
            parts.push("***");
            mask_next = false;
            continue;
        }
        mask_next = SECRET_FLAGS.contains(&part.as_str());
        parts.push(part);
    }
    parts.join(" ")
}

/// Query listing live dependents of `descriptor`, for kinds that have any.
pub fn attached(descriptor: &ResourceDescriptor) -> Option<Vec<String>> {
    let rg = descriptor.resource_group.as_str();
    let name = descriptor.name.as_str();
    match descriptor.kind {
        ResourceKind::AppServicePlan => Some(args(&[
            "webapp",
            "list",
            "-g",
            rg,
            "--query",
            &format!("[?ends_with(appServicePlanId, '/{}')].name", name),
        ])),
        ResourceKind::SqlServer => Some(args(&[
            "sql",
            "db",
            "list",
            "-g",
            rg,
            "--server",
            name,
            "--query",
            "[?name!='master'].name",
        ])),
        ResourceKind::VirtualNetwork => Some(args(&[
            "network",
            "vnet",
            "subnet",
            "list",
            "-g",
            rg,
            "--vnet-name",
            name,
            "--query",
            "[].name",
        ])),
        _ => None,
    }
}
