mod previews_changes_contract;
