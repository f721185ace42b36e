use std::path::Path;

use crate::error::ClientError;

/// Upper bound for review files sent to `/app/upload/`
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A review file loaded into memory, ready for a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, refusing anything over [`MAX_UPLOAD_BYTES`].
    pub async fn read<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref();

        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(ClientError::FileTooLarge {
                size: format_bytes(size),
                max: format_bytes(MAX_UPLOAD_BYTES),
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "reviews.txt".to_string());
        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("text/plain")
            .to_string();

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn size_human(&self) -> String {
        format_bytes(self.bytes.len() as u64)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(MAX_UPLOAD_BYTES), "10.00 MB");
    }

    #[tokio::test]
    async fn test_read_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "review\nGreat blender, very durable").unwrap();

        let upload = UploadFile::read(file.path()).await.unwrap();
        assert!(upload.file_name.ends_with(".csv"));
        assert_eq!(upload.mime, "text/csv");
        assert!(!upload.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_read_rejects_oversized_file() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.as_file().set_len(MAX_UPLOAD_BYTES + 1).unwrap();

        let err = UploadFile::read(file.path()).await.unwrap_err();
        assert!(matches!(err, ClientError::FileTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = UploadFile::read("/definitely/not/here/reviews.txt").await.unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
