use axum::extract::Multipart;

use tocshelf_core::is_pdf_filename;

use crate::error::ApiError;

/// An uploaded PDF with its original file name.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Pull the `file` field out of a multipart upload.
///
/// Other fields are drained and ignored. The file name is kept as sent;
/// path checks happen when the file is stored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {e}")))?
    {
        if field.name() != Some("file") {
            let _ = field.bytes().await;
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?
            .to_vec();
        file = Some(UploadedFile { filename, data });
    }

    let file = file.ok_or_else(|| ApiError::BadRequest("No file part".to_string()))?;
    if file.filename.is_empty() {
        return Err(ApiError::BadRequest("No selected file".to_string()));
    }
    if !is_pdf_filename(&file.filename) {
        return Err(ApiError::BadRequest("Invalid file type".to_string()));
    }
    Ok(file)
}
