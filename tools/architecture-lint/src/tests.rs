//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "inbound/http/users.rs",
    "use crate::domain::UserId; fn handler() { let _ = UserId::new(1); }",
    true
)]
#[case(
    "inbound/http/users.rs",
    "use crate::outbound::persistence::DieselUserRepository; fn handler() { let _ = DieselUserRepository; }",
    false
)]
#[case(
    "inbound/http/users.rs",
    "use outbound::persistence::DieselUserRepository; fn handler() { let _ = DieselUserRepository; }",
    false
)]
#[case(
    "inbound/http/users.rs",
    "use orgdirectory::outbound::persistence::DieselUserRepository; fn handler() { let _ = DieselUserRepository; }",
    false
)]
#[case(
    "inbound/http/users.rs",
    "use diesel::prelude::*; fn handler() {}",
    false
)]
#[case(
    "domain/user.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/persistence/user_repository.rs",
    "use crate::inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/persistence/user_repository.rs",
    "use inbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "domain/user.rs",
    "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;",
    false
)]
#[case(
    "domain/organization_service.rs",
    "use crate::domain::ports::OrganizationRepository; use tracing::error; fn f() {}",
    true
)]
#[case(
    "outbound/memory/mod.rs",
    "use actix_web::HttpResponse; fn f() { let _ = HttpResponse::Ok(); }",
    false
)]
#[case(
    "outbound/persistence/diesel_user_repository.rs",
    "use diesel::prelude::*; use orgdirectory::domain::ports::UserRepository; fn f() {}",
    true
)]
#[case(
    "inbound/http/users.rs",
    "fn handler() { let _ = diesel_async::RunQueryDsl::execute; }",
    false
)]
#[case(
    "domain/user.rs",
    "use crate::{domain::Role, inbound::http::envelope};",
    false
)]
#[case(
    "domain/user.rs",
    "use super::super::outbound::memory::InMemoryDirectory;",
    false
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn unknown_layer_is_a_parse_error(lint_single: LintSingle) {
    let result = lint_single.lint("server/mod.rs", "fn f() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn violations_name_the_layer_and_target() {
    let result = lint_sources(&[LintSource {
        file: PathBuf::from("inbound/http/users.rs"),
        contents: "use crate::outbound::memory::InMemoryDirectory;".to_owned(),
    }]);
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "inbound module must not depend on crate::outbound"
    );
}

#[rstest]
fn each_forbidden_target_is_reported_once() {
    let result = lint_sources(&[LintSource {
        file: PathBuf::from("outbound/persistence/pool.rs"),
        contents: "use actix_web::web; fn f() { let _ = actix_web::HttpResponse::Ok(); }".to_owned(),
    }]);
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].to_string(),
        "outbound/persistence/pool.rs: outbound module must not depend on external crate `actix_web`"
    );
}
