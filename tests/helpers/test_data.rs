//! Test data helpers for building request payloads

pub const TEST_BOUNDARY: &str = "thinkprint-test-boundary";

/// Builder for `multipart/form-data` request bodies
#[derive(Debug, Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        self.body
            .extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Content type header value and finished body
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={TEST_BOUNDARY}"), self.body)
    }
}

/// Registration form with a small fake selfie
pub fn registration_form(event_id: &str, phone: &str) -> MultipartBody {
    MultipartBody::new()
        .text("event_id", event_id)
        .text("phone", phone)
        .file("selfie", "selfie.jpg", b"fake-selfie-bytes")
}

/// Upload form carrying one file per name
pub fn upload_form(event_id: &str, filenames: &[&str]) -> MultipartBody {
    filenames
        .iter()
        .fold(MultipartBody::new().text("event_id", event_id), |form, name| {
            form.file("file", name, format!("content of {name}").as_bytes())
        })
}
