//! The authorization decision itself.
//!
//! A pure function of (route table, path, credential, now). Every failure
//! mode resolves locally into a [`Decision`]; nothing propagates past this
//! boundary, and there is no path that fails open to [`Decision::Allow`].

use chrono::{DateTime, Utc};

use crate::claims::{TokenClaims, decode_claims};
use crate::routes::{PathClass, RouteTable};

/// Outcome of the gate for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through to its handler.
    Allow,
    /// Send the client to the login flow, preserving the path it wanted so
    /// it can be replayed after authentication.
    RedirectToLogin { return_path: String },
    /// Authenticated clients never see the landing page.
    RedirectToDashboard,
    /// The bearer is authenticated but lacks the role this surface
    /// requires. No return path: replaying would re-trigger the denial.
    RedirectToUnauthorized,
}

/// A decision together with the claims that informed it.
///
/// Adapters that propagate identity downstream (request extensions) need
/// the decoded claims after an [`Decision::Allow`]; returning them here
/// keeps the decode single-pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub class: PathClass,
    pub decision: Decision,
    /// Present iff the credential decoded and is not expired.
    pub claims: Option<TokenClaims>,
}

/// Evaluate the gate for one request.
///
/// Control flow is classify → extract (done by the caller) → decode →
/// decide, computed once per request with no retries.
pub fn evaluate(
    table: &RouteTable,
    path: &str,
    credential: Option<&str>,
    now: DateTime<Utc>,
) -> Evaluation {
    let class = table.classify(path);

    match class {
        // Never inspect the credential on ungated surfaces.
        PathClass::Public | PathClass::ApiPassthrough | PathClass::StaticAsset => Evaluation {
            class,
            decision: Decision::Allow,
            claims: None,
        },

        PathClass::Root => match valid_claims(credential, path, now) {
            Some(claims) => Evaluation {
                class,
                decision: Decision::RedirectToDashboard,
                claims: Some(claims),
            },
            // Anonymous (or carrying a dead token): render the landing page.
            None => Evaluation {
                class,
                decision: Decision::Allow,
                claims: None,
            },
        },

        PathClass::AdminRestricted | PathClass::ApproverRestricted | PathClass::GenericProtected => {
            let Some(claims) = valid_claims(credential, path, now) else {
                return Evaluation {
                    class,
                    decision: Decision::RedirectToLogin {
                        return_path: path.to_string(),
                    },
                    claims: None,
                };
            };

            let decision = match class {
                PathClass::AdminRestricted if !claims.role.can_administer() => {
                    Decision::RedirectToUnauthorized
                }
                PathClass::ApproverRestricted if !claims.role.can_approve() => {
                    Decision::RedirectToUnauthorized
                }
                _ => Decision::Allow,
            };

            Evaluation {
                class,
                decision,
                claims: Some(claims),
            }
        }
    }
}

/// Evaluate and return only the [`Decision`].
pub fn decide(
    table: &RouteTable,
    path: &str,
    credential: Option<&str>,
    now: DateTime<Utc>,
) -> Decision {
    evaluate(table, path, credential, now).decision
}

/// Decode and expiry-check the credential.
///
/// Malformed and expired tokens are both treated as absent. The decode
/// failure variant is logged before being downgraded, so a client stuck in
/// a redirect loop leaves a trace.
fn valid_claims(
    credential: Option<&str>,
    path: &str,
    now: DateTime<Utc>,
) -> Option<TokenClaims> {
    let token = credential?;

    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(%err, path, "rejecting malformed bearer credential");
            return None;
        }
    };

    if claims.is_expired(now) {
        tracing::debug!(path, "rejecting expired bearer credential");
        return None;
    }

    Some(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;

    fn token_for(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("signature"),
        )
    }

    fn future_token(role: &str) -> String {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        token_for(&format!(r#"{{"role":"{role}","exp":{exp}}}"#))
    }

    fn expired_token(role: &str) -> String {
        let exp = (Utc::now() - Duration::hours(1)).timestamp();
        token_for(&format!(r#"{{"role":"{role}","exp":{exp}}}"#))
    }

    #[test]
    fn public_paths_allow_in_every_credential_state() {
        let table = RouteTable::default();
        let now = Utc::now();
        let expired = expired_token("admin");
        let live = future_token("user");

        for credential in [
            None,
            Some("garbage"),
            Some(expired.as_str()),
            Some(live.as_str()),
        ] {
            assert_eq!(decide(&table, "/login", credential, now), Decision::Allow);
            assert_eq!(decide(&table, "/healthz", credential, now), Decision::Allow);
        }
    }

    #[test]
    fn api_namespace_allows_in_every_credential_state() {
        let table = RouteTable::default();
        let now = Utc::now();
        let expired = expired_token("user");

        for credential in [None, Some("garbage"), Some(expired.as_str())] {
            assert_eq!(
                decide(&table, "/api/revisions", credential, now),
                Decision::Allow
            );
        }
    }

    #[test]
    fn anonymous_root_renders_landing() {
        let table = RouteTable::default();
        assert_eq!(decide(&table, "/", None, Utc::now()), Decision::Allow);
    }

    #[test]
    fn authenticated_root_goes_to_dashboard() {
        let table = RouteTable::default();
        let token = future_token("user");

        assert_eq!(
            decide(&table, "/", Some(&token), Utc::now()),
            Decision::RedirectToDashboard
        );
    }

    #[test]
    fn dead_token_on_root_still_renders_landing() {
        let table = RouteTable::default();
        let now = Utc::now();

        let expired = expired_token("user");
        assert_eq!(decide(&table, "/", Some(&expired), now), Decision::Allow);
        assert_eq!(decide(&table, "/", Some("not.a.token"), now), Decision::Allow);
    }

    #[test]
    fn missing_credential_redirects_to_login_with_exact_return_path() {
        let table = RouteTable::default();

        let decision = decide(&table, "/admin/users", None, Utc::now());
        assert_eq!(
            decision,
            Decision::RedirectToLogin {
                return_path: "/admin/users".to_string()
            }
        );
    }

    #[test]
    fn malformed_credential_is_treated_like_missing() {
        let table = RouteTable::default();
        let now = Utc::now();
        let expected = Decision::RedirectToLogin {
            return_path: "/revisions".to_string(),
        };

        assert_eq!(decide(&table, "/revisions", Some("one-segment"), now), expected);
        assert_eq!(decide(&table, "/revisions", Some("h.!!!.s"), now), expected);
        assert_eq!(
            decide(
                &table,
                "/revisions",
                Some(&format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"))),
                now
            ),
            expected
        );
    }

    #[test]
    fn expired_credential_is_treated_like_missing() {
        let table = RouteTable::default();
        let token = expired_token("admin");

        assert_eq!(
            decide(&table, "/approvals", Some(&token), Utc::now()),
            Decision::RedirectToLogin {
                return_path: "/approvals".to_string()
            }
        );
    }

    #[test]
    fn admin_surface_requires_admin_role() {
        let table = RouteTable::default();
        let now = Utc::now();

        let user = future_token("user");
        let approver = future_token("approver");
        let admin = future_token("admin");

        assert_eq!(
            decide(&table, "/admin/users", Some(&user), now),
            Decision::RedirectToUnauthorized
        );
        assert_eq!(
            decide(&table, "/admin/users", Some(&approver), now),
            Decision::RedirectToUnauthorized
        );
        assert_eq!(decide(&table, "/admin/users", Some(&admin), now), Decision::Allow);
    }

    #[test]
    fn approver_surface_admits_approver_and_admin() {
        let table = RouteTable::default();
        let now = Utc::now();

        let approver = future_token("approver");
        let admin = future_token("admin");
        let user = future_token("user");
        let auditor = future_token("auditor");

        assert_eq!(decide(&table, "/approvals", Some(&approver), now), Decision::Allow);
        assert_eq!(decide(&table, "/approvals", Some(&admin), now), Decision::Allow);
        assert_eq!(
            decide(&table, "/approvals", Some(&user), now),
            Decision::RedirectToUnauthorized
        );
        assert_eq!(
            decide(&table, "/approvals", Some(&auditor), now),
            Decision::RedirectToUnauthorized
        );
    }

    #[test]
    fn generic_surface_admits_any_authenticated_role() {
        let table = RouteTable::default();
        let now = Utc::now();

        let user = future_token("user");
        let auditor = future_token("auditor");

        assert_eq!(decide(&table, "/revisions/42", Some(&user), now), Decision::Allow);
        assert_eq!(decide(&table, "/dashboard", Some(&auditor), now), Decision::Allow);
    }

    #[test]
    fn role_claim_defaults_to_user_for_authorization() {
        let table = RouteTable::default();
        let token = token_for(r#"{"sub":"rev-author-7"}"#);
        let now = Utc::now();

        assert_eq!(decide(&table, "/revisions", Some(&token), now), Decision::Allow);
        assert_eq!(
            decide(&table, "/admin/users", Some(&token), now),
            Decision::RedirectToUnauthorized
        );
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let table = RouteTable::default();
        let token = token_for(r#"{"role":"approver"}"#);

        assert_eq!(
            decide(&table, "/approvals", Some(&token), Utc::now()),
            Decision::Allow
        );
    }

    #[test]
    fn evaluation_exposes_claims_only_for_live_tokens() {
        let table = RouteTable::default();
        let now = Utc::now();

        let live = future_token("user");
        let evaluation = evaluate(&table, "/revisions", Some(&live), now);
        assert_eq!(evaluation.decision, Decision::Allow);
        assert_eq!(evaluation.claims.unwrap().role.as_str(), "user");

        let dead = expired_token("user");
        let evaluation = evaluate(&table, "/revisions", Some(&dead), now);
        assert!(evaluation.claims.is_none());

        // Ungated surfaces skip the decode entirely.
        let evaluation = evaluate(&table, "/healthz", Some(&live), now);
        assert!(evaluation.claims.is_none());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the gate is total. Arbitrary paths and arbitrary
            /// credential bytes never panic and never fail open past the
            /// documented Allow cases.
            #[test]
            fn gate_never_panics(path in "/[a-z0-9/._-]{0,32}", credential in proptest::option::of(".{0,96}")) {
                let table = RouteTable::default();
                let _ = decide(&table, &path, credential.as_deref(), Utc::now());
            }

            /// Property: on protected surfaces, any undecodable credential
            /// resolves exactly like a missing one.
            #[test]
            fn garbage_credentials_match_missing(raw in "[^.]{0,40}") {
                let table = RouteTable::default();
                let now = Utc::now();

                // A single segment can never decode; both must agree.
                let with_garbage = decide(&table, "/revisions", Some(&raw), now);
                let with_nothing = decide(&table, "/revisions", None, now);
                prop_assert_eq!(with_garbage, with_nothing);
            }
        }
    }
}
