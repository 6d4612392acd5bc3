mod tears_down_dependents_first_contract;
