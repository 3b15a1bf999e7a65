//! Workspace root package; hosts workspace-level tooling configuration only.
