//! Data access layer for chat log exports.

mod chat_parser;

#[allow(unused_imports)]
pub use chat_parser::{
    ingest_file,
    ingest_reader,
    parse_line,
    FieldDefect,
    IngestReport,
    ParseOptions,
    ParsedRecord,
    RecordError,
    TimestampField,
};
