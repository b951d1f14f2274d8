pub mod documents;
pub mod filename;
pub mod pdf;
pub mod storage;

pub use documents::{DocumentService, PdfDocument};
pub use pdf::HttpPdfRasterizer;
pub use storage::S3BlobStore;
