use tracing::info;

use crate::draft::{ContactSubmission, FormDraft, ProfileUpdate};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::model::{Credentials, Profile, SignupRequest};
use crate::session::{Session, SessionContext};

/// Sign-in, sign-up, profile editing, newsletter and contact form.
#[derive(Clone)]
pub struct Accounts {
    client: ApiClient,
    session: SessionContext,
}

impl Accounts {
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The client carrying the current session token, if any.
    pub fn authorized_client(&self) -> Result<ApiClient, ClientError> {
        Ok(match self.session.token()? {
            Some(token) => self.client.clone().with_token(token),
            None => self.client.clone(),
        })
    }

    fn signed_in_user(&self) -> Result<String, ClientError> {
        self.session
            .user_id()?
            .ok_or_else(|| ClientError::Unauthorized("no active session".to_string()))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let auth = self.client.login(credentials).await?;
        self.session.establish(&auth)
    }

    /// First sign-up step: mail a one-time code to `email`.
    pub async fn request_otp(&self, email: &str) -> Result<(), ClientError> {
        self.client.send_otp(email).await
    }

    /// Second sign-up step: verify the code, create the account and sign in.
    /// Nothing is created when the code is rejected.
    pub async fn signup_with_otp(&self, request: &SignupRequest, otp: &str) -> Result<Session, ClientError> {
        self.client.verify_otp(&request.email, otp).await?;
        let auth = self.client.signup(request).await?;
        self.session.establish(&auth)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.logout()
    }

    /// Profile of the signed-in user; also refreshes the cached admin flag.
    pub async fn load_profile(&self) -> Result<Profile, ClientError> {
        let user_id = self.signed_in_user()?;
        let profile = self.authorized_client()?.profile(&user_id).await?;
        self.session.set_admin(profile.is_admin)?;
        Ok(profile)
    }

    /// Save the profile editor. A new avatar is uploaded first and its URL
    /// sent as `profile_url`; a failed upload saves nothing.
    pub async fn save_profile(&self, draft: &FormDraft, avatar: Option<&[u8]>) -> Result<ProfileUpdate, ClientError> {
        let user_id = self.signed_in_user()?;
        let mut update = ProfileUpdate::from_draft(draft, None)?;
        let client = self.authorized_client()?;
        if let Some(image) = avatar {
            update.profile_url = Some(client.upload_image(image).await?);
        }
        client.update_profile(&user_id, &update).await?;
        info!(user_id = %user_id, "profile saved");
        Ok(update)
    }

    pub async fn subscribe(&self, email: &str) -> Result<(), ClientError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ClientError::Validation(vec!["Please enter a valid email address".to_string()]));
        }
        self.client.subscribe(email).await
    }

    pub async fn contact(&self, draft: &FormDraft) -> Result<(), ClientError> {
        let submission = ContactSubmission::from_draft(draft)?;
        let missing: Vec<String> = [
            ("name", &submission.name),
            ("email", &submission.email),
            ("message", &submission.message),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| format!("{field} is required"))
        .collect();
        if !missing.is_empty() {
            return Err(ClientError::Validation(missing));
        }
        self.client.submit_message(&submission).await
    }
}
