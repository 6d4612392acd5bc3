mod rejects_existing_manifest_contract;
