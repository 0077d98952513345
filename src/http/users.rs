//! User service: auth, profiles, users, contact messages.

use reqwest::Method;
use tracing::info;

use super::envelope::{ListBody, MessagesBody};
use super::{ApiClient, Service};
use crate::draft::{ContactSubmission, ProfileUpdate};
use crate::error::ClientError;
use crate::model::{
    AuthResponse, Credentials, Message, MessageReply, OtpRequest, Profile, SignupRequest, User,
};

impl ApiClient {
    /// `POST /api/auth/signup`
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "signup"])?;
        let auth: AuthResponse = self
            .fetch("/api/auth/signup", self.request(Method::POST, url).json(request))
            .await?;
        info!(user_id = %auth.id, "signed up");
        Ok(auth)
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "login"])?;
        self.fetch("/api/auth/login", self.request(Method::POST, url).json(credentials))
            .await
    }

    /// `POST /api/auth/send-otp` with `{email}`.
    pub async fn send_otp(&self, email: &str) -> Result<(), ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "send-otp"])?;
        let body = OtpRequest {
            email: email.to_string(),
            otp: None,
        };
        self.send("/api/auth/send-otp", self.request(Method::POST, url).json(&body))
            .await
            .map(drop)
    }

    /// `POST /api/auth/verify-otp` with `{email, otp}`.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "verify-otp"])?;
        let body = OtpRequest {
            email: email.to_string(),
            otp: Some(otp.to_string()),
        };
        self.send("/api/auth/verify-otp", self.request(Method::POST, url).json(&body))
            .await
            .map(drop)
    }

    /// `GET /api/auth/profile?userId=`
    pub async fn profile(&self, user_id: &str) -> Result<Profile, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "profile"])?;
        let mut profile: Profile = self
            .fetch(
                "/api/auth/profile",
                self.request(Method::GET, url).query(&[("userId", user_id)]),
            )
            .await?;
        if profile.id.is_empty() {
            profile.id = user_id.to_string();
        }
        Ok(profile)
    }

    /// `PUT /api/auth/profile?userId=`
    pub async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "profile"])?;
        self.send(
            "/api/auth/profile",
            self.request(Method::PUT, url)
                .query(&[("userId", user_id)])
                .json(update),
        )
        .await
        .map(drop)
    }

    /// `GET /api/auth/getAllUsers`
    pub async fn all_users(&self) -> Result<Vec<User>, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "getAllUsers"])?;
        let body: ListBody<User> = self
            .fetch("/api/auth/getAllUsers", self.request(Method::GET, url))
            .await?;
        Ok(body.into_items())
    }

    /// `POST /api/auth/messageSubmission`
    pub async fn submit_message(&self, message: &ContactSubmission) -> Result<(), ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "messageSubmission"])?;
        self.send(
            "/api/auth/messageSubmission",
            self.request(Method::POST, url).json(message),
        )
        .await
        .map(drop)
    }

    /// `GET /api/auth/getMessages`
    pub async fn messages(&self) -> Result<Vec<Message>, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "getMessages"])?;
        let body: MessagesBody = self
            .fetch("/api/auth/getMessages", self.request(Method::GET, url))
            .await?;
        Ok(body.messages)
    }

    /// `POST /api/auth/replyMessage/:id`; the backend returns the updated message.
    pub async fn reply_message(&self, message_id: &str, response: &str) -> Result<Message, ClientError> {
        let url = self.url(Service::Users, &["api", "auth", "replyMessage", message_id])?;
        let body = MessageReply {
            response: response.to_string(),
        };
        self.fetch(
            "/api/auth/replyMessage",
            self.request(Method::POST, url).json(&body),
        )
        .await
    }
}
