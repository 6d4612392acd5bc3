mod creates_in_dependency_order_contract;
mod preconditions_contract;
