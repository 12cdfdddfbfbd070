use super::*;
use crate::encode::sink::InMemorySink;
use crate::params::Preset;

fn tiny_renderer() -> CpuRenderer {
    CpuRenderer::new(RenderOpts {
        canvas: Canvas::new(80, 20).unwrap(),
        scale: 2,
        quality: Quality::Preview,
        font: None,
    })
    .unwrap()
}

#[test]
fn loop_pushes_every_sample_in_order_at_render_size() {
    let mut r = tiny_renderer();
    let mut sink = InMemorySink::new();
    let n = encode_loop(&mut r, &Preset::Greco.defaults(), 8, 0.5, &mut sink).unwrap();
    assert_eq!(n, 4);
    assert!(sink.is_finished());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 160,
            height: 40,
            fps: 8
        })
    );
    let idx: Vec<u32> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    assert!(sink.frames().iter().all(|(_, f)| f.width == 160));
}

#[test]
fn loop_rejects_bad_timing() {
    let mut r = tiny_renderer();
    let mut sink = InMemorySink::new();
    let p = Preset::Greco.defaults();
    assert!(encode_loop(&mut r, &p, 0, 3.0, &mut sink).is_err());
    assert!(encode_loop(&mut r, &p, 24, f64::INFINITY, &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn params_path_sits_beside_the_output() {
    assert_eq!(
        params_path_for(Path::new("assets/banner.gif")),
        PathBuf::from("assets/banner.params.json")
    );
    assert_eq!(
        params_path_for(Path::new("out.png")),
        PathBuf::from("out.params.json")
    );
}

#[test]
fn still_job_writes_png_and_params() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("still/banner.png");
    let mut job = RenderJob::new(Mode::Still { t: DEFAULT_STILL_T }, &out, Preset::Military.defaults());
    job.canvas = Canvas::new(120, 30).unwrap();
    job.quality = Quality::Preview;
    job.save_params = true;

    let report = run(&job).unwrap();
    assert_eq!(report.frames, 1);
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (120, 30));

    let saved = std::fs::read_to_string(report.params_path.unwrap()).unwrap();
    assert!(saved.ends_with('\n'));
    let back: SceneParams = serde_json::from_str(&saved).unwrap();
    assert_eq!(back.preset, Preset::Military);
    assert!((back.cam.r - job.params.cam.r).abs() < 1e-12);
    assert_eq!(back.labels, job.params.labels);
}

#[test]
fn sheet_job_writes_one_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sheet.png");
    let mut job = RenderJob::new(
        Mode::Sheet {
            times: vec![0.0, 0.5],
            columns: 1,
        },
        &out,
        Preset::Greco.defaults(),
    );
    job.canvas = Canvas::new(60, 15).unwrap();
    job.scale = 1;
    let report = run(&job).unwrap();
    assert_eq!(report.frames, 2);
    assert!(report.params_path.is_none());
    assert!(out.is_file());
}
