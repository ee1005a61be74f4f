//! Integration tests for the `PdfToDocument` component.
//!
//! All PDFs are generated in memory with lopdf, so these run anywhere
//! without fixtures on disk or native libraries.

mod common;

use common::{capture_warnings, pdf_with_pages, pdf_without_text, write_pdf};
use edgequake_pdf2doc::{
    ByteStream, ComponentConfig, ConversionProgressCallback, ConverterConfig, ConverterData,
    ConverterError, ConverterFromConfig, ConverterRegistry, DefaultConverter, Document, Meta,
    MetaInput, PageSelection, Pdf2DocError, PdfConverter, PdfToDocument, Source, SourceError,
    DEFAULT_PAGE_BREAK,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn meta(value: Value) -> Meta {
    value.as_object().cloned().expect("object literal")
}

/// A strategy that ignores page text and reports the page count instead.
#[derive(Debug, Clone, PartialEq)]
struct CustomConverter {
    key: String,
    more: bool,
}

impl Default for CustomConverter {
    fn default() -> Self {
        Self {
            key: "value".into(),
            more: false,
        }
    }
}

impl PdfConverter for CustomConverter {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn convert(&self, reader: &lopdf::Document) -> Result<Document, ConverterError> {
        let pages = reader.get_pages().len();
        Ok(Document::with_meta(
            format!("{} pages", pages),
            meta(json!({"converted_by": "custom"})),
        ))
    }

    fn to_config(&self) -> ConverterData {
        meta(json!({"key": self.key, "more": self.more}))
    }
}

impl ConverterFromConfig for CustomConverter {
    const TYPE_NAME: &'static str = "converter::CustomConverter";

    fn from_config(data: &ConverterData) -> Result<Self, Pdf2DocError> {
        let key = data
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| Pdf2DocError::InvalidConverterConfig {
                type_name: Self::TYPE_NAME.into(),
                detail: "missing 'key'".into(),
            })?;
        let more = data.get("more").and_then(Value::as_bool).unwrap_or(false);
        Ok(Self {
            key: key.to_string(),
            more,
        })
    }
}

fn custom_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::default();
    registry.register::<CustomConverter>();
    registry
}

// ── Construction & configuration ─────────────────────────────────────────────

#[test]
fn test_init() {
    let component = PdfToDocument::new();
    assert!(component.converter().is_none());
}

#[test]
fn test_to_config_default() {
    let value = serde_json::to_value(PdfToDocument::new().to_config()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "edgequake_pdf2doc::convert::PdfToDocument",
            "init_parameters": {"converter": null}
        })
    );
}

#[test]
fn test_to_config_custom_converter() {
    let component = PdfToDocument::with_converter(Arc::new(CustomConverter::default()));
    let value = serde_json::to_value(component.to_config()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "edgequake_pdf2doc::convert::PdfToDocument",
            "init_parameters": {
                "converter": {
                    "type": "converter::CustomConverter",
                    "data": {"key": "value", "more": false}
                }
            }
        })
    );
}

#[test]
fn test_from_config_defaults() {
    let config: ComponentConfig = serde_json::from_value(json!({
        "type": "edgequake_pdf2doc::convert::PdfToDocument",
        "init_parameters": {}
    }))
    .unwrap();
    let component = PdfToDocument::from_config(&config, &ConverterRegistry::default()).unwrap();
    assert!(component.converter().is_none());
}

#[test]
fn test_from_config_custom_converter() {
    let config: ComponentConfig = serde_json::from_value(json!({
        "type": "edgequake_pdf2doc::convert::PdfToDocument",
        "init_parameters": {
            "converter": {
                "type": "converter::CustomConverter",
                "data": {"key": "value", "more": false}
            }
        }
    }))
    .unwrap();
    let component = PdfToDocument::from_config(&config, &custom_registry()).unwrap();

    let converter = component.converter().expect("converter restored");
    assert_eq!(converter.type_name(), "converter::CustomConverter");
    assert_eq!(
        converter.to_config(),
        meta(json!({"key": "value", "more": false}))
    );
}

#[test]
fn test_custom_converter_round_trip_behaves_identically() {
    let original = PdfToDocument::with_converter(Arc::new(CustomConverter {
        key: "other".into(),
        more: true,
    }));
    let rebuilt = PdfToDocument::from_config(&original.to_config(), &custom_registry()).unwrap();
    assert_eq!(rebuilt.to_config(), original.to_config());

    let sources = || {
        vec![
            Source::from(ByteStream::with_meta(
                pdf_with_pages(&["a", "b"]),
                meta(json!({"author": "A"})),
            )),
            Source::from("missing.pdf"),
            Source::from(ByteStream::new(pdf_with_pages(&["c", "d", "e"]))),
        ]
    };
    let call = || meta(json!({"language": "it"}));

    let expected = original.run_with_meta(sources(), call()).unwrap();
    let actual = rebuilt.run_with_meta(sources(), call()).unwrap();
    assert_eq!(actual.documents, expected.documents);
    assert_eq!(actual.documents.len(), 2);
    assert_eq!(actual.documents[1].content, "3 pages");
}

#[test]
fn test_from_config_unknown_converter_type() {
    let config = ComponentConfig {
        type_name: PdfToDocument::TYPE_NAME.into(),
        init_parameters: edgequake_pdf2doc::InitParameters {
            converter: Some(ConverterConfig {
                type_name: "converter::CustomConverter".into(),
                data: ConverterData::new(),
            }),
        },
    };
    let err = PdfToDocument::from_config(&config, &ConverterRegistry::default()).unwrap_err();
    assert!(matches!(
        err,
        Pdf2DocError::UnknownConverterType { ref type_name } if type_name == "converter::CustomConverter"
    ));
}

#[test]
fn test_from_config_invalid_converter_data() {
    let json = json!({
        "type": "edgequake_pdf2doc::convert::PdfToDocument",
        "init_parameters": {
            "converter": {"type": "converter::CustomConverter", "data": {"more": true}}
        }
    })
    .to_string();
    let err = PdfToDocument::from_json(&json, &custom_registry()).unwrap_err();
    assert!(matches!(err, Pdf2DocError::InvalidConverterConfig { .. }));
}

#[test]
fn test_json_round_trip_default_converter_settings() {
    let conv = DefaultConverter::default()
        .with_page_break('\n')
        .with_pages(PageSelection::Range(2, 3));
    let component = PdfToDocument::with_converter(Arc::new(conv));

    let json = component.to_json().unwrap();
    let rebuilt = PdfToDocument::from_json(&json, &ConverterRegistry::default()).unwrap();
    assert_eq!(rebuilt.to_config(), component.to_config());

    let bytes = pdf_with_pages(&["one", "two", "three", "four"]);
    let out = rebuilt.run([ByteStream::new(bytes)]).unwrap();
    let content = &out.documents[0].content;
    assert!(content.contains("two") && content.contains("three"));
    assert!(!content.contains("one") && !content.contains("four"));
}

// ── Running ──────────────────────────────────────────────────────────────────

#[test]
fn test_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(
        dir.path(),
        "react.pdf",
        &pdf_with_pages(&["A Synergistic Framework for Reasoning and Acting"]),
    );

    let out = PdfToDocument::new().run([&path]).unwrap();
    assert_eq!(out.documents.len(), 1);
    let doc = &out.documents[0];
    assert!(doc.content.contains("Reasoning and Acting"));
    assert_eq!(doc.meta["file_path"], json!(path.display().to_string()));
    assert!(!doc.id.is_empty());
}

#[test]
fn test_page_breaks_added() {
    let bytes = pdf_with_pages(&["Page one", "Page two", "Page three", "Page four"]);
    let out = PdfToDocument::new().run([ByteStream::new(bytes)]).unwrap();
    let content = &out.documents[0].content;
    assert_eq!(content.matches(DEFAULT_PAGE_BREAK).count(), 3);
    let pages: Vec<&str> = content.split('\u{000C}').collect();
    assert_eq!(pages.len(), 4);
    assert!(pages[3].contains("Page four"));
}

#[test]
fn test_run_with_meta() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "paper.pdf", &pdf_with_pages(&["Hello"]));
    let stream = ByteStream::with_meta(
        pdf_with_pages(&["World"]),
        meta(json!({"language": "en", "author": "test_author"})),
    );

    let out = PdfToDocument::new()
        .run_with_meta(
            vec![Source::from(stream), Source::from(&path)],
            meta(json!({"language": "it"})),
        )
        .unwrap();
    assert_eq!(out.documents.len(), 2);

    let from_stream = &out.documents[0].meta;
    assert_eq!(from_stream["language"], json!("it"));
    assert_eq!(from_stream["author"], json!("test_author"));

    let from_path = &out.documents[1].meta;
    assert_eq!(from_path["language"], json!("it"));
    assert_eq!(from_path["file_path"], json!(path.display().to_string()));
}

#[test]
fn test_run_with_per_source_meta() {
    let sources = vec![
        ByteStream::new(pdf_with_pages(&["first"])),
        ByteStream::new(pdf_with_pages(&["second"])),
    ];
    let out = PdfToDocument::new()
        .run_with_meta(
            sources,
            vec![meta(json!({"n": 1})), meta(json!({"n": 2}))],
        )
        .unwrap();
    assert_eq!(out.documents[0].meta["n"], json!(1));
    assert_eq!(out.documents[1].meta["n"], json!(2));
}

#[test]
fn test_meta_length_mismatch_aborts_run() {
    let sources = vec![
        ByteStream::new(pdf_with_pages(&["first"])),
        ByteStream::new(pdf_with_pages(&["second"])),
    ];
    let err = PdfToDocument::new()
        .run_with_meta(sources, MetaInput::PerSource(vec![meta(json!({"n": 1}))]))
        .unwrap_err();
    assert!(matches!(
        err,
        Pdf2DocError::MetaLengthMismatch {
            sources: 2,
            meta: 1
        }
    ));
}

#[test]
fn test_run_error_handling() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_pdf(dir.path(), "good.pdf", &pdf_with_pages(&["Readable"]));

    let (out, logs) = capture_warnings(|| {
        PdfToDocument::new()
            .run(vec![
                Source::from(&good),
                Source::from("non_existing_file.pdf"),
            ])
            .unwrap()
    });

    assert!(logs.contains("Could not read non_existing_file.pdf"), "{logs}");
    assert_eq!(out.documents.len(), 1);
    assert_eq!(out.stats.skipped, 1);
}

#[test]
fn test_non_pdf_bytes_are_skipped() {
    let (out, logs) = capture_warnings(|| {
        PdfToDocument::new()
            .run(vec![
                ByteStream::new(b"just some plain text".to_vec()),
                ByteStream::new(pdf_with_pages(&["Survivor"])),
            ])
            .unwrap()
    });

    assert_eq!(out.documents.len(), 1);
    assert!(out.documents[0].content.contains("Survivor"));
    assert!(
        logs.contains("Could not read ByteStream(20 bytes) and convert it to Document, skipping"),
        "{logs}"
    );
}

#[test]
fn test_mixed_sources_preserve_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "middle.pdf", &pdf_with_pages(&["Bravo"]));

    let out = PdfToDocument::new()
        .run(vec![
            Source::from(ByteStream::new(pdf_with_pages(&["Alpha"]))),
            Source::from(&path),
            Source::from(ByteStream::new(pdf_with_pages(&["Charlie"]))),
        ])
        .unwrap();

    let contents: Vec<&str> = out.documents.iter().map(|d| d.content.as_str()).collect();
    assert_eq!(contents.len(), 3);
    assert!(contents[0].contains("Alpha"));
    assert!(contents[1].contains("Bravo"));
    assert!(contents[2].contains("Charlie"));
}

#[test]
fn test_run_with_custom_converter() {
    let component = PdfToDocument::builder()
        .converter(Arc::new(CustomConverter::default()))
        .build();
    let out = component
        .run_with_meta(
            [ByteStream::new(pdf_with_pages(&["a", "b", "c"]))],
            meta(json!({"batch": 7})),
        )
        .unwrap();

    let doc = &out.documents[0];
    assert_eq!(doc.content, "3 pages");
    assert!(!doc.meta.contains_key("converted_by"));
    assert_eq!(doc.meta["batch"], json!(7));
}

#[test]
fn test_empty_document() {
    let (out, logs) = capture_warnings(|| {
        PdfToDocument::new()
            .run([ByteStream::new(pdf_without_text(2))])
            .unwrap()
    });

    assert_eq!(out.documents.len(), 1);
    assert_eq!(out.documents[0].content, "");
    assert_eq!(out.stats.empty, 1);
    assert!(
        logs.contains("could not extract text from the file ByteStream("),
        "{logs}"
    );
}

#[test]
fn test_empty_source_list() {
    let out = PdfToDocument::new().run(Vec::<Source>::new()).unwrap();
    assert!(out.documents.is_empty());
    assert_eq!(out.stats.total_sources, 0);
}

#[test]
fn test_same_input_same_id() {
    let bytes = pdf_with_pages(&["Stable"]);
    let component = PdfToDocument::new();
    let a = component.run([ByteStream::new(bytes.clone())]).unwrap();
    let b = component.run([ByteStream::new(bytes)]).unwrap();
    assert_eq!(a.documents[0].id, b.documents[0].id);
}

// ── Progress & output ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for Recorder {
    fn on_run_start(&self, total_sources: usize) {
        self.events.lock().unwrap().push(format!("start {total_sources}"));
    }
    fn on_source_complete(&self, source_num: usize, _total: usize, _content_len: usize) {
        self.events.lock().unwrap().push(format!("ok {source_num}"));
    }
    fn on_source_skipped(&self, source_num: usize, _total: usize, error: &SourceError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("skip {source_num} {}", error.input()));
    }
    fn on_run_complete(&self, total_sources: usize, converted: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {converted}/{total_sources}"));
    }
}

#[test]
fn test_progress_callback_events() {
    let recorder = Arc::new(Recorder::default());
    let component = PdfToDocument::builder()
        .progress_callback(recorder.clone())
        .build();

    component
        .run(vec![
            Source::from(ByteStream::new(pdf_with_pages(&["x"]))),
            Source::from("missing.pdf"),
        ])
        .unwrap();

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "start 2".to_string(),
            "ok 1".to_string(),
            "skip 2 missing.pdf".to_string(),
            "done 1/2".to_string(),
        ]
    );
}

#[test]
fn test_run_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("nested").join("docs.json");

    let stats = PdfToDocument::new()
        .run_to_file(
            vec![
                Source::from(ByteStream::new(pdf_with_pages(&["Saved"]))),
                Source::from("missing.pdf"),
            ],
            meta(json!({"batch": 1})),
            &out_path,
        )
        .unwrap();
    assert_eq!(stats.converted, 1);
    assert_eq!(stats.skipped, 1);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let docs = written["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert!(docs[0]["content"].as_str().unwrap().contains("Saved"));
    assert_eq!(docs[0]["meta"]["batch"], json!(1));
    assert!(written.get("stats").is_none());
}

#[test]
fn test_component_is_shareable_across_threads() {
    let component = Arc::new(PdfToDocument::new());
    let handles: Vec<_> = (0..3)
        .map(|i| {
            let component = Arc::clone(&component);
            std::thread::spawn(move || {
                let text = format!("Thread{i}");
                let out = component
                    .run([ByteStream::new(pdf_with_pages(&[text.as_str()]))])
                    .unwrap();
                assert!(out.documents[0].content.contains(&text));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
