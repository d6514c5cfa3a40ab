/// Optional workspace file read from the workspace root.
pub const WORKSPACE_FILE: &str = "islands.json";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MODULES_DIR: &str = "modules";
pub const DEFAULT_TARGET_DIR: &str = "target";
pub const RUNTIME_CONFIG_FILE: &str = "config.json";

pub const ENV_OUTPUT_DIR: &str = "ISLANDS_OUTPUT_DIR";
pub const ENV_JAVA_VERSION: &str = "ISLANDS_JAVA_VERSION";
pub const ENV_SDKMAN_DIR: &str = "SDKMAN_DIR";
