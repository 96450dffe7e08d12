/// One file received for analysis.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, media_type: media_type.into(), bytes }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
