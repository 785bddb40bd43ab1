// src/filter.rs
// =============================================================================
// Decides which repository entries never make it into a snapshot.
//
// The rule table is static: dependency folders, build output, media and
// office files, archives, lockfiles, data dumps, editor folders, .env files,
// minified bundles and source maps, coverage/log/cache folders.
//
// An entry is dropped if its name OR its full path matches any rule.
// Directory rules are anchored to whole path segments so that `out` drops
// `out/` and `web/out/` but not `layout.rs`.
//
// This is a pure predicate. Logging skipped entries is the caller's job.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

/// One row of the exclusion table.
#[derive(Debug)]
pub struct ExclusionRule {
    pub category: &'static str,
    pub pattern: Regex,
}

impl ExclusionRule {
    fn new(category: &'static str, pattern: &str) -> Self {
        Self {
            category,
            // The table is a compile-time constant, so a bad pattern is a bug
            pattern: Regex::new(pattern).expect("invalid exclusion pattern"),
        }
    }

    fn matches(&self, name: &str, path: &str) -> bool {
        self.pattern.is_match(path) || self.pattern.is_match(name)
    }
}

// (^|/)NAME(/|$) matches NAME as a whole path segment
static RULES: LazyLock<Vec<ExclusionRule>> = LazyLock::new(|| {
    vec![
        // Dependencies and package management
        ExclusionRule::new("dependencies", r"(^|/)(node_modules|vendor|bower_components)(/|$)"),
        ExclusionRule::new("lockfile", r"(^|/)(package-lock\.json|yarn\.lock|pnpm-lock\.yaml)$"),
        // Build outputs and compiled files
        ExclusionRule::new("build output", r"(^|/)(dist|build|out|\.next|\.nuxt)(/|$)"),
        // Binary and media files
        ExclusionRule::new("image", r"(?i)\.(jpg|jpeg|png|gif|ico|svg|webp)$"),
        ExclusionRule::new("document", r"(?i)\.(pdf|doc|docx|ppt|pptx|xls|xlsx)$"),
        ExclusionRule::new("media", r"(?i)\.(mp3|mp4|wav|avi|mov|webm)$"),
        ExclusionRule::new("archive", r"(?i)\.(zip|tar|gz|rar|7z)$"),
        // Data files
        ExclusionRule::new("data", r"\.(csv|json|h5)$"),
        // IDE and editor files
        ExclusionRule::new("editor", r"(^|/)(\.idea|\.vscode)(/|$)"),
        ExclusionRule::new("editor", r"(^|/)\.DS_Store$"),
        // Environment and local config files (.env, .env.local, ...)
        ExclusionRule::new("environment", r"(^|/)\.env(\.[^/]*)?(/|$)"),
        // Large generated files
        ExclusionRule::new("generated", r"\.map$"),
        ExclusionRule::new("generated", r"\.min\.(js|css)$"),
        // Test coverage reports
        ExclusionRule::new("coverage", r"(^|/)(coverage|\.nyc_output)(/|$)"),
        // Logs
        ExclusionRule::new("log", r"\.log$"),
        ExclusionRule::new("log", r"(^|/)logs(/|$)"),
        // Cache directories
        ExclusionRule::new("cache", r"(^|/)(\.cache|\.temp|\.tmp)(/|$)"),
    ]
});

/// The whole table, in evaluation order.
pub fn rules() -> &'static [ExclusionRule] {
    &RULES
}

/// First rule that drops this entry, if any.
pub fn matching_rule(name: &str, path: &str) -> Option<&'static ExclusionRule> {
    RULES.iter().find(|rule| rule.matches(name, path))
}

/// Should this entry be left out of the tree?
pub fn is_excluded(name: &str, path: &str) -> bool {
    matching_rule(name, path).is_some()
}
