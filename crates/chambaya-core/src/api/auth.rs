//! Account endpoints: login, registration and profile.

use chambaya_types::{
    Credentials, LoginResponse, MessageResponse, ProfileUpdate, RegisterRequest, RegisteredUser,
    SuccessEnvelope,
};
use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::{Value, json};

use super::{ApiClient, ApiError, ApiResult, image_part};

impl ApiClient {
    /// `POST /auth/login` with email + password (or a Google id).
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let request = self.request(Method::POST, "/auth/login").json(credentials);
        self.send(request).await
    }

    /// `POST /users/googlelogin`, answered with `{success, data}`.
    ///
    /// # Errors
    /// Returns an [`super::ApiErrorKind::Api`] error unless `success` is true
    /// and `data` carries the session.
    pub async fn google_login(&self, id_google: &str) -> ApiResult<LoginResponse> {
        let request = self
            .request(Method::POST, "/users/googlelogin")
            .json(&Credentials::google(id_google));
        let envelope: SuccessEnvelope<LoginResponse> = self.send(request).await?;
        match envelope {
            SuccessEnvelope {
                success: true,
                data: Some(login),
                ..
            } => Ok(login),
            SuccessEnvelope { message, .. } => Err(ApiError::api(message.as_deref())),
        }
    }

    /// # Errors
    /// Returns an error on transport failure or a rejected registration.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisteredUser> {
        let request = self.request(Method::POST, "/users/register").json(request);
        self.send(request).await
    }

    /// Confirms the emailed verification code.
    ///
    /// # Errors
    /// Returns an error on transport failure or an invalid code.
    pub async fn verify_account(&self, code: &str) -> ApiResult<MessageResponse> {
        let request = self
            .request(Method::PUT, "/users/verifyaccount")
            .json(&json!({ "codeVerification": code }));
        self.send(request).await
    }

    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn accept_terms(&self, user_id: &str) -> ApiResult<MessageResponse> {
        let request = self.request(Method::PUT, &format!("/users/changeterms/{user_id}"));
        self.send(request).await
    }

    /// Uploads profile fields (and optionally a picture) as multipart.
    ///
    /// # Errors
    /// Returns an error if the picture cannot be read or the request fails.
    pub async fn complete_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> ApiResult<MessageResponse> {
        let mut form = Form::new();
        for (name, value) in update.text_fields() {
            form = form.text(name, value);
        }
        if let Some(path) = &update.image_path {
            form = form.part("imageProfile", image_part(path).await?);
        }

        let request = self
            .request(Method::PUT, &format!("/users/completeprofile/{user_id}"))
            .multipart(form);
        self.send(request).await
    }

    /// Profile of the session owner, as the server returns it.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn profile_details(&self) -> ApiResult<Value> {
        self.send(self.request(Method::GET, "/users/profile/details"))
            .await
    }

    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn user_by_id(&self, user_id: &str) -> ApiResult<Value> {
        self.send(self.request(Method::GET, &format!("/users/{user_id}")))
            .await
    }
}
