//! git-specific constants
//!
//! Centralized definitions for git command names, flags, and special values.

/// git command binary name
pub const GIT_COMMAND: &str = "git";

/// Environment variable overriding the git binary path
pub const GIT_BINARY_ENV: &str = "GITFIXUP_GIT";

/// Minimum supported git version (`rebase -i --root` first shipped in 1.7.12)
pub const MIN_GIT_VERSION: &str = "1.7.12";

/// git subcommands
pub mod commands {
    pub const REV_PARSE: &str = "rev-parse";
    pub const LOG: &str = "log";
    pub const DIFF: &str = "diff";
    pub const COMMIT: &str = "commit";
    pub const REBASE: &str = "rebase";
    pub const APPLY: &str = "apply";
    pub const CHECKOUT: &str = "checkout";
    pub const BRANCH: &str = "branch";
    pub const CONFIG: &str = "config";
    pub const MERGE_BASE: &str = "merge-base";
}

/// git command flags
pub mod flags {
    pub const SHOW_TOPLEVEL: &str = "--show-toplevel";
    pub const IS_INSIDE_WORK_TREE: &str = "--is-inside-work-tree";
    pub const VERIFY: &str = "--verify";
    pub const QUIET: &str = "--quiet";
    pub const CACHED: &str = "--cached";
    pub const CHECK: &str = "--check";
    pub const IGNORE_ALL_SPACE: &str = "-w";
    /// No context lines; `diff -w` context carries the new whitespace
    pub const NO_CONTEXT: &str = "-U0";
    /// `git apply`: accept context-free hunks
    pub const UNIDIFF_ZERO: &str = "--unidiff-zero";
    pub const INTERACTIVE: &str = "-i";
    pub const AUTOSQUASH: &str = "--autosquash";
    pub const ROOT: &str = "--root";
    pub const ONELINE: &str = "--oneline";
    pub const EXTENDED_REGEXP: &str = "-E";
    pub const REMOTES: &str = "-r";
    /// Global `-c <key>=<value>` config override
    pub const CONFIG_OVERRIDE: &str = "-c";
    pub const IS_ANCESTOR: &str = "--is-ancestor";
    pub const CONTAINS: &str = "--contains";
    pub const BOOL: &str = "--bool";
    pub const GET: &str = "--get";
    pub const PARENTS_FORMAT: &str = "--format=%P";
    pub const MAX_ONE: &str = "-n1";
    pub const NO_COLOR: &str = "--no-color";
    pub const VERSION: &str = "--version";
    /// Global flag, keeps git from spawning a pager on captured output
    pub const NO_PAGER: &str = "--no-pager";
    /// Separates revisions from paths
    pub const END_OF_REVS: &str = "--";
}

/// Environment variables set on noninteractive child processes
pub mod env {
    pub const SEQUENCE_EDITOR: &str = "GIT_SEQUENCE_EDITOR";
    pub const EDITOR: &str = "GIT_EDITOR";
    /// `true(1)` accepts the todo list / message unchanged
    pub const ACCEPT_UNCHANGED: &str = "true";
}

/// git config keys read by gitfixup
pub mod config_keys {
    pub const ALLOW_REWRITE_PUBLISHED: &str = "gitfixup.allowRewritePublished";
    pub const ASSUME_YES: &str = "gitfixup.assumeYes";
}

/// Special git values
pub mod special {
    /// Suffix peeling a revision to its commit object
    pub const PEEL_COMMIT: &str = "^{commit}";

    /// Prefix for `commit --fixup=<target>`
    pub const FIXUP_PREFIX: &str = "--fixup=";

    /// Prefix for `log --grep=<pattern>`
    pub const GREP_PREFIX: &str = "--grep=";

    /// Version output prefix (e.g., "git version 2.43.0")
    pub const VERSION_PREFIX: &str = "git version ";

    /// Subject markers that autosquash acts on
    pub const SQUASH_MARKER_PATTERN: &str = "^(squash|fixup|amend)! ";

    /// Print non-ASCII paths verbatim instead of octal-quoted
    pub const QUOTE_PATH_OFF: &str = "core.quotePath=false";

    /// Tip of the current branch
    pub const HEAD: &str = "HEAD";
}

/// Error detection patterns in git output
pub mod errors {
    /// Pattern indicating not a git repository
    pub const NOT_A_REPO: &str = "not a git repository";
}
