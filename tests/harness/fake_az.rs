use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Shell stand-in for the Azure CLI.
///
/// Every invocation is appended to `az.log`. Resource groups live under
/// `state/groups/` and resources under `state/resources/`, one empty file per
/// `-n` name, so `show` answers from what earlier `create`/`delete` calls did.
pub(crate) struct FakeAz {
    pub(crate) bin: PathBuf,
    state: PathBuf,
    log_file: PathBuf,
}

impl FakeAz {
    pub(crate) fn install(root: &Path) -> Self {
        let bin_dir = root.join("bin");
        let state = root.join("state");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        fs::create_dir_all(state.join("groups")).expect("Failed to create groups dir");
        fs::create_dir_all(state.join("resources")).expect("Failed to create resources dir");
        let log_file = root.join("az.log");

        let script = format!(
            r#"#!/bin/sh
STATE="{state}"
echo "$*" >> "{log}"

NAME=""
VERB=""
PREV=""
for arg in "$@"; do
    if [ "$PREV" = "-n" ] || [ "$PREV" = "--name" ]; then
        NAME="$arg"
    fi
    if [ -z "$VERB" ]; then
        case "$arg" in
            show|create|delete|list|exists|set|update|add|purge) VERB="$arg" ;;
        esac
    fi
    PREV="$arg"
done

case "$*" in
    "account show"*)
        if [ -f "$STATE/logged_out" ]; then
            echo "Please run 'az login' to setup account." >&2
            exit 1
        fi
        echo '{{"id":"00000000-0000-0000-0000-000000000001","name":"Reporting Dev","user":{{"name":"ops@example.com","type":"user"}}}}'
        exit 0
        ;;
    "account set"*)
        exit 0
        ;;
    "group exists"*)
        if [ -f "$STATE/groups/$NAME" ]; then echo true; else echo false; fi
        exit 0
        ;;
    "group create"*)
        touch "$STATE/groups/$NAME"
        exit 0
        ;;
esac

case "$VERB" in
    show)
        if [ -f "$STATE/resources/$NAME" ]; then
            case "$*" in
                *outputResources*) echo '[]' ;;
                *"--query id"*) echo "/subscriptions/fake/providers/fake/$NAME" ;;
            esac
            exit 0
        fi
        echo "(ResourceNotFound) The Resource '$NAME' was not found." >&2
        exit 3
        ;;
    create)
        if [ -f "$STATE/fail_create_$NAME" ]; then
            echo "(Conflict) create of $NAME was rejected" >&2
            exit 1
        fi
        touch "$STATE/resources/$NAME"
        ;;
    delete)
        rm -f "$STATE/resources/$NAME"
        ;;
    list)
        echo '[]'
        ;;
esac
exit 0
"#,
            state = state.display(),
            log = log_file.display()
        );

        let path = bin_dir.join("az");
        fs::write(&path, script).expect("Failed to write az script");
        let mut perms = fs::metadata(&path).expect("Failed to get metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to set permissions");

        Self { bin: path, state, log_file }
    }

    pub(crate) fn add_group(&self, name: &str) {
        fs::write(self.state.join("groups").join(name), "").expect("Failed to add group");
    }

    pub(crate) fn has_group(&self, name: &str) -> bool {
        self.state.join("groups").join(name).exists()
    }

    pub(crate) fn add_resource(&self, name: &str) {
        fs::write(self.state.join("resources").join(name), "").expect("Failed to add resource");
    }

    pub(crate) fn has_resource(&self, name: &str) -> bool {
        self.state.join("resources").join(name).exists()
    }

    pub(crate) fn log_out(&self) {
        fs::write(self.state.join("logged_out"), "").expect("Failed to log out");
    }

    pub(crate) fn fail_create(&self, name: &str) {
        fs::write(self.state.join(format!("fail_create_{}", name)), "")
            .expect("Failed to mark create failure");
    }

    /// Every recorded invocation, one argv per line.
    pub(crate) fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log_file)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Invocations that would change something in Azure.
    pub(crate) fn mutations(&self) -> Vec<String> {
        const VERBS: [&str; 6] = ["create", "delete", "update", "set", "add", "purge"];
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("account set"))
            .filter(|call| call.split_whitespace().any(|word| VERBS.contains(&word)))
            .collect()
    }

    /// `-n` values of resource `verb` calls in call order. NSG rules and
    /// resource groups are left out.
    pub(crate) fn names_for(&self, verb: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("group "))
            .filter_map(|call| {
                let words: Vec<&str> = call.split_whitespace().collect();
                if !words.contains(&verb) || words.contains(&"rule") {
                    return None;
                }
                let pos = words.iter().position(|word| *word == "-n")?;
                words.get(pos + 1).map(|name| name.to_string())
            })
            .collect()
    }
}
