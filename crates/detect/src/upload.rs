use {
    crate::{DetectConfig, DetectError, EncodedFrame},
    bytes::Bytes,
    reqwest::{Client, Response, Url, multipart},
};

pub const FRAME_FIELD: &str = "frame";
pub const FRAME_FILE_NAME: &str = "frame.jpg";
pub const FRAME_MIME: &str = "image/jpeg";

/// Posts encoded frames to the detection endpoint.
///
/// No retries: a failed request is reported to the caller and forgotten.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    url: Url,
}

impl UploadClient {
    pub fn new(config: &DetectConfig) -> Result<Self, DetectError> {
        let url = config.endpoint_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send one frame as `multipart/form-data` and return the response
    /// once its status is known. Non-success statuses are errors.
    pub async fn send(&self, frame: EncodedFrame) -> Result<Response, DetectError> {
        let length = frame.len() as u64;
        let part = multipart::Part::stream_with_length(frame.into_bytes(), length)
            .file_name(FRAME_FILE_NAME)
            .mime_str(FRAME_MIME)?;
        let form = multipart::Form::new().part(FRAME_FIELD, part);

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        log::debug!("detect response status: {}", status);
        if !status.is_success() {
            return Err(DetectError::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// Read the full body. An empty body gives `None`.
    pub async fn read(response: Response) -> Result<Option<Bytes>, DetectError> {
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    pub async fn upload(&self, frame: EncodedFrame) -> Result<Option<Bytes>, DetectError> {
        let response = self.send(frame).await?;
        Self::read(response).await
    }
}
