//! Production implementations of the HTTP seams.

use async_trait::async_trait;
use donut_canva::{AutofillJob, CanvaApi, TokenResponse};
use donut_core::payload::FieldValues;
use donut_openai::{ChatMessage, OpenAiClient};

use crate::error::PipelineError;
use crate::ports::{DesignApi, TextGenerator};

#[async_trait]
impl DesignApi for CanvaApi {
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, PipelineError> {
        Ok(CanvaApi::refresh_token(self, refresh_token).await?)
    }

    async fn create_autofill(
        &self,
        access_token: &str,
        template_id: &str,
        title: &str,
        data: &FieldValues,
    ) -> Result<AutofillJob, PipelineError> {
        Ok(CanvaApi::create_autofill(self, access_token, template_id, title, data).await?)
    }

    async fn get_autofill(
        &self,
        access_token: &str,
        job_id: &str,
    ) -> Result<AutofillJob, PipelineError> {
        Ok(CanvaApi::get_autofill(self, access_token, job_id).await?)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, PipelineError> {
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        Ok(self.complete_json(&messages).await?)
    }
}
