use super::*;

fn artifact(name: &str) -> Artifact {
    Artifact {
        file_name: name.to_string(),
        mime: JPEG_MIME,
        bytes: vec![0xff, 0xd8, 0xff, 0xd9],
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("sink_unit")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn in_memory_sink_keeps_delivery_order() {
    let mut sink = InMemorySink::new();
    sink.deliver(&artifact("a.jpeg")).unwrap();
    sink.deliver(&artifact("b.jpeg")).unwrap();
    let names: Vec<_> = sink.artifacts().iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(names, ["a.jpeg", "b.jpeg"]);
}

#[test]
fn directory_sink_writes_file_and_leaves_no_partial() {
    let dir = scratch_dir("writes");
    let mut sink = DirectorySink::new(&dir);
    sink.deliver(&artifact("newspaper-article-1.jpeg")).unwrap();

    let path = dir.join("newspaper-article-1.jpeg");
    assert_eq!(sink.written(), [path.clone()]);
    assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xd8, 0xff, 0xd9]);

    let entries: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["newspaper-article-1.jpeg"]);
}

#[test]
fn directory_sink_rejects_path_like_names() {
    let dir = scratch_dir("rejects");
    let mut sink = DirectorySink::new(&dir);
    for bad in ["", "../x.jpeg", "a/b.jpeg", ".hidden.jpeg"] {
        let err = sink.deliver(&artifact(bad)).unwrap_err();
        assert!(matches!(err, NewsprintError::Validation(_)), "{bad}");
    }
    assert!(sink.written().is_empty());
}
