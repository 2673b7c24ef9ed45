//! Phone-number login with one-time codes.
//!
//! A code lives in the [`OtpStore`] under the phone number for a fixed TTL.
//! Confirming compares the presented code with the stored one and deletes it
//! on a match in one atomic store command, so a code is consumed at most
//! once. A typo leaves the code in place and can be retried until it expires.
//! Customers and admins share the code flow; the confirm step decides which
//! account table the phone is resolved against.

use std::time::Duration;

use async_trait::async_trait;
use cache::{CodeCheck, OtpStore};
use model::{
    Admin, AuthInfo, LoginConfirmRequest, LoginResponse, RegisterConfirmRequest, Role,
    SendCodeRequest, User, UserRequest,
};
use rand::Rng;
use repository::{AdminRepository, RepositoryError, UserRepository};
use tracing::{info, instrument, warn};

use crate::sms::SmsSender;
use crate::{validation, ServiceError};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Issues a fresh code for the phone and hands it to the SMS sender.
    /// A previous unconsumed code for the same phone is replaced.
    async fn send_code(&self, req: &SendCodeRequest) -> Result<(), ServiceError>;

    /// Consumes a matching code and resolves the user owning the phone.
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] when no code is pending (never issued,
    /// expired or already used) or no user has this phone;
    /// [`ServiceError::Unauthorized`] when the code does not match.
    async fn confirm_login(&self, req: &LoginConfirmRequest) -> Result<LoginResponse, ServiceError>;

    /// Same as [`AuthService::confirm_login`], resolved against the admins.
    async fn confirm_admin_login(
        &self,
        req: &LoginConfirmRequest,
    ) -> Result<LoginResponse, ServiceError>;

    /// Consumes a matching code and creates a user with the confirmed phone.
    ///
    /// The payload is validated and the phone checked for an existing
    /// account before the code is touched, so a rejected registration keeps
    /// the code.
    async fn confirm_register(
        &self,
        req: &RegisterConfirmRequest,
    ) -> Result<LoginResponse, ServiceError>;
}

pub struct AuthServiceImpl<U, A, S, M> {
    users_repo: U,
    admins_repo: A,
    store: S,
    sms: M,
    otp_ttl: Duration,
}

/// Six decimal digits, zero-padded.
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

fn login_response(user: User) -> LoginResponse {
    LoginResponse {
        id: user.id,
        auth: AuthInfo {
            subject_id: user.id,
            role: Role::User,
        },
        phone: user.phone,
    }
}

fn admin_response(admin: Admin) -> LoginResponse {
    LoginResponse {
        id: admin.id,
        auth: AuthInfo {
            subject_id: admin.id,
            role: Role::Admin,
        },
        phone: admin.phone,
    }
}

impl<U, A, S, M> AuthServiceImpl<U, A, S, M>
where
    U: UserRepository,
    A: AdminRepository,
    S: OtpStore,
    M: SmsSender,
{
    pub fn new(users_repo: U, admins_repo: A, store: S, sms: M, otp_ttl: Duration) -> Self {
        Self {
            users_repo,
            admins_repo,
            store,
            sms,
            otp_ttl,
        }
    }

    /// Deletes the pending code if `code` matches it.
    async fn consume_code(&self, phone: &str, code: &str) -> Result<(), ServiceError> {
        match self.store.take_if_matches(phone, code).await? {
            CodeCheck::Consumed => Ok(()),
            CodeCheck::Missing => Err(ServiceError::NotFound(
                "verification code not found or expired".into(),
            )),
            CodeCheck::Mismatch => {
                warn!(phone, "verification code mismatch");
                Err(ServiceError::Unauthorized("verification code mismatch".into()))
            }
        }
    }

    async fn ensure_unregistered(&self, phone: &str) -> Result<(), ServiceError> {
        match self.users_repo.get_by_phone(phone).await {
            Ok(_) => Err(ServiceError::Validation("phone is already registered".into())),
            Err(RepositoryError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<U, A, S, M> AuthService for AuthServiceImpl<U, A, S, M>
where
    U: UserRepository,
    A: AdminRepository,
    S: OtpStore,
    M: SmsSender,
{
    #[instrument(skip(self, req), fields(phone = %req.mobile_phone))]
    async fn send_code(&self, req: &SendCodeRequest) -> Result<(), ServiceError> {
        validation::phone(&req.mobile_phone)?;

        let code = generate_code();
        self.store
            .set_ex(&req.mobile_phone, &code, self.otp_ttl)
            .await?;
        self.sms
            .send(&req.mobile_phone, &format!("Your verification code: {code}"))
            .await?;

        info!(ttl = ?self.otp_ttl, "verification code issued");
        Ok(())
    }

    #[instrument(skip(self, req), fields(phone = %req.mobile_phone))]
    async fn confirm_login(&self, req: &LoginConfirmRequest) -> Result<LoginResponse, ServiceError> {
        validation::phone(&req.mobile_phone)?;
        self.consume_code(&req.mobile_phone, &req.sms_code).await?;

        let user = self.users_repo.get_by_phone(&req.mobile_phone).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(login_response(user))
    }

    #[instrument(skip(self, req), fields(phone = %req.mobile_phone))]
    async fn confirm_admin_login(
        &self,
        req: &LoginConfirmRequest,
    ) -> Result<LoginResponse, ServiceError> {
        validation::phone(&req.mobile_phone)?;
        self.consume_code(&req.mobile_phone, &req.sms_code).await?;

        let admin = self.admins_repo.get_by_phone(&req.mobile_phone).await?;
        info!(admin_id = %admin.id, "admin logged in");
        Ok(admin_response(admin))
    }

    #[instrument(skip(self, req), fields(phone = %req.mobile_phone))]
    async fn confirm_register(
        &self,
        req: &RegisterConfirmRequest,
    ) -> Result<LoginResponse, ServiceError> {
        let user = UserRequest {
            phone: req.mobile_phone.clone(),
            ..req.user.clone()
        };
        validation::user(&user)?;
        self.ensure_unregistered(&user.phone).await?;
        self.consume_code(&req.mobile_phone, &req.otp).await?;

        let user = self.users_repo.create(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(login_response(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
