/*!
# Split writing

One [WriterDoc] per split file.
!*/
mod writer_doc;
pub use writer_doc::WriterDoc;
