mod prints_resolved_names_contract;
