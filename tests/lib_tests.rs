use photodex::bulk::{bulk_entry_header, bulk_url, document_id, split_bulk_body};
use photodex::engine::{glob_match, is_os_hidden_file, path_relative_to, should_include_in_walk};
use photodex::utils::{apply_file_to_opts, parse_photodex_toml};
use photodex::{DateZone, ExtractorKind, FailurePolicy, Opts};
use std::path::{Path, PathBuf};

// --- path_relative_to ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/photos");
    let path = PathBuf::from("/photos/2021/img.jpg");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("2021/img.jpg"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/photos");
    let path = PathBuf::from("/other/img.jpg");
    assert_eq!(path_relative_to(&path, &base), None);
}

// --- glob_match / should_include_in_walk ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("@eaDir", "@eaDir"));
    assert!(!glob_match("@eaDir", "@eaDi"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.xmp", "IMG_0001.xmp"));
    assert!(glob_match("*.xmp", ".xmp"));
    assert!(!glob_match("*.xmp", "IMG_0001.xmp.bak"));
    assert!(glob_match("IMG_*", "IMG_0001.jpg"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("IMG_000?.jpg", "IMG_0001.jpg"));
    assert!(!glob_match("IMG_000?.jpg", "IMG_000.jpg"));
}

#[test]
fn test_glob_match_negation_stripped() {
    assert!(glob_match("!*.xmp", "a.xmp"));
}

#[test]
fn test_os_hidden_files() {
    assert!(is_os_hidden_file(Path::new("/p/.DS_Store")));
    assert!(is_os_hidden_file(Path::new("/p/Thumbs.db")));
    assert!(is_os_hidden_file(Path::new("/p/._IMG_0001.jpg")));
    assert!(!is_os_hidden_file(Path::new("/p/IMG_0001.jpg")));
}

#[test]
fn test_should_include_root_excluded() {
    let root = PathBuf::from("/photos");
    assert!(!should_include_in_walk(&root, &root, &[]));
}

#[test]
fn test_should_include_exclude_pattern_glob() {
    let root = PathBuf::from("/photos");
    let path = PathBuf::from("/photos/2021/img.xmp");
    assert!(!should_include_in_walk(&path, &root, &["*.xmp".to_string()]));
}

#[test]
fn test_should_include_exclude_directory_component() {
    let root = PathBuf::from("/photos");
    let path = PathBuf::from("/photos/@eaDir/img.jpg/SYNOPHOTO_THUMB_M.jpg");
    assert!(!should_include_in_walk(&path, &root, &["@eaDir".to_string()]));
}

#[test]
fn test_should_include_not_excluded() {
    let root = PathBuf::from("/photos");
    let path = PathBuf::from("/photos/2021/img.jpg");
    assert!(should_include_in_walk(
        &path,
        &root,
        &["*.xmp".to_string(), "@eaDir".to_string()]
    ));
}

// --- bulk header ---

#[test]
fn test_document_id_is_stable_and_path_dependent() {
    let a = document_id(Path::new("/photos/a.jpg"));
    assert_eq!(a, document_id(Path::new("/photos/a.jpg")));
    assert_ne!(a, document_id(Path::new("/photos/b.jpg")));
    assert_eq!(a.len(), 64);
}

#[test]
fn test_bulk_entry_header_shape() {
    let header = bulk_entry_header(Path::new("/photos/a.jpg"), "photos");
    let json = serde_json::to_value(&header).unwrap();
    assert_eq!(json["index"]["_index"], "photos");
    assert_eq!(
        json["index"]["_id"],
        document_id(Path::new("/photos/a.jpg"))
    );
}

// --- bulk body / url ---

#[test]
fn test_bulk_url_appends_suffix() {
    assert_eq!(
        bulk_url("http://localhost:9200").unwrap().as_str(),
        "http://localhost:9200/_bulk"
    );
    assert_eq!(
        bulk_url("http://es.local:9200/prefix/").unwrap().as_str(),
        "http://es.local:9200/prefix/_bulk"
    );
}

#[test]
fn test_bulk_url_rejects_garbage() {
    assert!(bulk_url("not a url").is_err());
}

#[test]
fn test_split_bulk_body_whole() {
    let body = b"h1\nr1\nh2\nr2\n";
    assert_eq!(split_bulk_body(body, 0), vec![body.to_vec()]);
}

#[test]
fn test_split_bulk_body_by_documents() {
    let body = b"h1\nr1\nh2\nr2\nh3\nr3\n";
    let chunks = split_bulk_body(body, 2);
    assert_eq!(
        chunks,
        vec![b"h1\nr1\nh2\nr2\n".to_vec(), b"h3\nr3\n".to_vec()]
    );
}

#[test]
fn test_split_bulk_body_empty() {
    assert!(split_bulk_body(b"", 10).is_empty());
}

// --- config file ---

#[test]
fn test_config_file_overrides_defaults() {
    let file = parse_photodex_toml(
        r#"
log_level = "debug"

[indexer]
thread_count = 8
queue_size = 10
on_error = "skip"
date_zone = "local"
extractor = "native"
exclude = ["*.xmp"]

[elasticsearch]
url = "http://es:9200"
index = "pics"
bulk_size = 500
"#,
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.thread_count, 8);
    assert_eq!(opts.queue_size, 10);
    assert_eq!(opts.on_error, FailurePolicy::Skip);
    assert_eq!(opts.date_zone, DateZone::Local);
    assert_eq!(opts.extractor, ExtractorKind::Native);
    assert_eq!(opts.exclude, vec!["*.xmp".to_string()]);
    assert_eq!(opts.url, "http://es:9200");
    assert_eq!(opts.index_name, "pics");
    assert_eq!(opts.bulk_size, 500);
    assert_eq!(opts.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_config_file_partial_keeps_defaults() {
    let file = parse_photodex_toml("[elasticsearch]\nindex = \"pics\"\n").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.index_name, "pics");
    assert_eq!(opts.extraction_thread_count(), 4);
    assert_eq!(opts.to_extract_channel_size(), 50);
    assert_eq!(opts.on_error, FailurePolicy::Abort);
    assert_eq!(opts.url, "http://localhost:9200");
}

#[test]
fn test_config_rejects_unknown_policy() {
    assert!(parse_photodex_toml("[indexer]\non_error = \"retry\"\n").is_err());
}

#[test]
fn test_non_positive_sizes_fall_back_to_defaults() {
    let opts = Opts {
        thread_count: 0,
        queue_size: 0,
        ..Opts::default()
    };
    assert_eq!(opts.extraction_thread_count(), 4);
    assert_eq!(opts.to_extract_channel_size(), 50);
}
