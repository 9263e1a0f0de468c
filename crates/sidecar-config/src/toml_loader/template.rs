//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Sidecar Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[shell]
# program = ""            # empty = $SHELL, falling back to the platform default
# args = []
# login_shell = true
# extra_path_dirs = []    # appended to PATH after the built-in tool directories

[shell.env]
# EDITOR = "nvim"

[terminal]
# cols = 80               # 1-500, initial geometry before the first resize
# rows = 30               # 1-500

[startup]
# assistant = "claude"    # claude, codex
# launch_command = "claude --continue"
# auto_launch = true
# banner_delay_ms = 100   # 0-10000
# launch_delay_ms = 500   # 0-10000

[logging]
# level = "INFO"          # TRACE, DEBUG, INFO, WARNING, ERROR
"##
}
