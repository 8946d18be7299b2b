//! Username/password login for both principal kinds.

use crate::{
    auth::{
        password::{verify_decoy, verify_password},
        principal::PrincipalKind,
        token::TokenService,
    },
    error::AppError,
    models::admin::{LoginRequest, LoginResponse},
    services::directory::Directory,
};

/// Check credentials and issue a session token.
///
/// Unknown, inactive and wrong-password logins all fail with
/// [`AppError::InvalidCredentials`], and all of them pay for one bcrypt comparison,
/// so neither the body nor the timing tells which usernames exist.
pub async fn login(
    directory: &dyn Directory,
    tokens: &TokenService,
    kind: PrincipalKind,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let Some(principal) = directory.active_principal(kind, &request.username).await? else {
        verify_decoy(&request.password).await?;
        tracing::debug!(%kind, username = %request.username, "unknown or inactive account");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&request.password, principal.password_hash()).await? {
        tracing::debug!(%kind, username = %request.username, "password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens
        .issue(&principal)
        .map_err(|err| AppError::Internal(err.to_string()))?;

    tracing::info!(%kind, principal_id = principal.id(), "admin logged in");

    Ok(LoginResponse {
        token,
        user: principal,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        auth::principal::fixtures::{main_admin, shop_admin},
        services::directory::memory::MemoryDirectory,
    };

    fn request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn directory() -> MemoryDirectory {
        let hash = bcrypt::hash("shop123", 4).unwrap();
        let mut inactive = shop_admin(3, "retired", 7, &hash);
        if let crate::auth::principal::Principal::ShopAdmin(admin) = &mut inactive {
            admin.is_active = false;
        }

        MemoryDirectory::default()
            .with_principal(main_admin(1, "admin", &bcrypt::hash("admin123", 4).unwrap()))
            .with_principal(shop_admin(2, "barista", 7, &hash))
            .with_principal(inactive)
    }

    #[tokio::test]
    async fn shop_admin_login_issues_shop_scoped_token() {
        let tokens = TokenService::new("secret", 24);
        let response = login(
            &directory(),
            &tokens,
            PrincipalKind::ShopAdmin,
            request("barista", "shop123"),
        )
        .await
        .unwrap();

        let claims = tokens.verify(&response.token).unwrap();
        assert_eq!(claims.shop_id(), Some(7));
        assert_eq!(claims.principal_id(), 2);
        assert_eq!(response.user.kind(), PrincipalKind::ShopAdmin);
    }

    #[tokio::test]
    async fn main_admin_login_has_no_shop() {
        let tokens = TokenService::new("secret", 24);
        let response = login(
            &directory(),
            &tokens,
            PrincipalKind::MainAdmin,
            request("admin", "admin123"),
        )
        .await
        .unwrap();

        assert_eq!(tokens.verify(&response.token).unwrap().shop_id(), None);
    }

    #[tokio::test]
    async fn every_failure_is_invalid_credentials() {
        let tokens = TokenService::new("secret", 24);
        let cases = [
            (PrincipalKind::ShopAdmin, request("barista", "wrong")),
            (PrincipalKind::ShopAdmin, request("nobody", "shop123")),
            (PrincipalKind::ShopAdmin, request("retired", "shop123")),
            // Usernames are per kind: a shop admin cannot log in as main admin.
            (PrincipalKind::MainAdmin, request("barista", "shop123")),
        ];

        for (kind, req) in cases {
            let err = login(&directory(), &tokens, kind, req).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn unknown_user_costs_as_much_as_wrong_password() {
        let tokens = TokenService::new("secret", 24);
        let hash = bcrypt::hash("admin123", bcrypt::DEFAULT_COST).unwrap();
        let directory = MemoryDirectory::default().with_principal(main_admin(1, "admin", &hash));

        // First call builds the decoy hash; keep it out of the measurement.
        let _ = login(&directory, &tokens, PrincipalKind::MainAdmin, request("warmup", "x")).await;

        let started = Instant::now();
        let err = login(&directory, &tokens, PrincipalKind::MainAdmin, request("admin", "nope"))
            .await
            .unwrap_err();
        let wrong_password = started.elapsed();
        assert!(matches!(err, AppError::InvalidCredentials));

        let started = Instant::now();
        let err = login(&directory, &tokens, PrincipalKind::MainAdmin, request("ghost", "nope"))
            .await
            .unwrap_err();
        let unknown_user = started.elapsed();
        assert!(matches!(err, AppError::InvalidCredentials));

        assert!(
            unknown_user * 4 > wrong_password,
            "wrong_password={wrong_password:?} unknown_user={unknown_user:?}"
        );
    }
}
