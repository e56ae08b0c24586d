use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fdt_invoker_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn invocation(renderer_dir: PathBuf, output_dir: PathBuf) -> RenderInvocation {
    RenderInvocation {
        renderer_dir,
        descriptor: PathBuf::from("/sets/F1/Render/Json/testMe.json"),
        resolution: Resolution::new(1280, 720).unwrap(),
        output_dir,
        frames: FrameSpan::new(10, 19).unwrap(),
    }
}

#[test]
fn args_follow_the_fixed_layout() {
    let inv = invocation(PathBuf::from("/opt/fd/v1"), PathBuf::from("/out"));
    let args: Vec<String> = inv
        .args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let expected_out = PathBuf::from("/out")
        .join(OUTPUT_IMAGE_TEMPLATE)
        .to_string_lossy()
        .into_owned();
    assert_eq!(
        args,
        vec![
            "/sets/F1/Render/Json/testMe.json",
            "-exportVideo",
            "-imageSize",
            "1280x720",
            "-videoOutputPath",
            expected_out.as_str(),
            "-clusterSize",
            "12",
            "-startFrame",
            "10",
            "-endFrame",
            "19",
            "-vidExportCameraName",
            "renderCAM_NEWShape",
        ]
    );
    assert_eq!(inv.executable(), PathBuf::from("/opt/fd/v1/freedview.exe"));
}

#[test]
fn last_digit_run_picks_the_final_group() {
    assert_eq!(last_digit_run("wauwStills_F0012.jpg"), Some("0012"));
    assert_eq!(last_digit_run("cam2_shot_0450"), Some("0450"));
    assert_eq!(last_digit_run("7"), Some("7"));
    assert_eq!(last_digit_run("no_digits.jpg"), None);
    assert_eq!(last_digit_run("é12é"), Some("12"));
}

#[test]
fn normalize_renames_and_keeps_padding() {
    let dir = scratch_dir("normalize");
    std::fs::write(dir.join("wauwStills_F0001.jpg"), b"a").unwrap();
    std::fs::write(dir.join("wauwStills_F0002.jpg"), b"b").unwrap();
    std::fs::write(dir.join("0003.jpg"), b"c").unwrap();
    std::fs::write(dir.join("readme.txt"), b"d").unwrap();

    let renamed = normalize_output_names(&dir).unwrap();
    assert_eq!(renamed, 2);

    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["0001.jpg", "0002.jpg", "0003.jpg", "readme.txt"]);
    assert_eq!(std::fs::read(dir.join("0001.jpg")).unwrap(), b"a");
}

#[test]
fn normalize_does_not_clobber_existing_targets() {
    let dir = scratch_dir("clobber");
    std::fs::write(dir.join("0005.jpg"), b"keep").unwrap();
    std::fs::write(dir.join("shot_0005.jpg"), b"other").unwrap();

    assert_eq!(normalize_output_names(&dir).unwrap(), 0);
    assert_eq!(std::fs::read(dir.join("0005.jpg")).unwrap(), b"keep");
    assert!(dir.join("shot_0005.jpg").exists());
}

#[test]
fn missing_executable_fails_after_resetting_output() {
    let root = scratch_dir("missing_exe");
    let out = root.join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("stale.jpg"), b"old").unwrap();

    let inv = invocation(root.join("no_renderer"), out.clone());
    assert!(matches!(inv.run(), Err(TesterError::Render(_))));
    assert!(out.is_dir());
    assert!(!out.join("stale.jpg").exists());
}
