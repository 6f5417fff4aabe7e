//! Member resolution for session commands.
//!
//! Each member has their own cooking session. Rather than requiring
//! `--member` on every invocation, the member is resolved through a chain:
//!
//! 1. `--member <name>`: explicit per-command override
//! 2. `SOUS_MEMBER` env var: shell/session level
//! 3. `member` in `~/.sous/config.toml`
//! 4. `"default"`
//!
//! Login and invites live outside Sous; a member is just a name.

use std::env;

use crate::config::Config;

pub const DEFAULT_MEMBER: &str = "default";

/// Resolve the acting member from the chain.
pub fn resolve_member(explicit: Option<&str>, config: &Config) -> String {
    resolve(
        explicit,
        env::var("SOUS_MEMBER").ok().as_deref(),
        config.member.as_deref(),
    )
}

fn resolve(explicit: Option<&str>, env: Option<&str>, configured: Option<&str>) -> String {
    [explicit, env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(DEFAULT_MEMBER)
        .to_string()
}
