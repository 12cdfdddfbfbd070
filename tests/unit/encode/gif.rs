use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA::new(w, h, px.repeat((w * h) as usize), true).unwrap()
}

#[test]
fn filter_graph_builds_and_applies_a_diff_palette() {
    let g = gif_filter_graph(24, Canvas::BANNER);
    assert_eq!(
        g,
        "fps=24,scale=1200:300:flags=lanczos,split[s0][s1];[s0]palettegen=stats_mode=diff[p];[s1][p]paletteuse=dither=bayer:bayer_scale=4"
    );
}

#[test]
fn command_streams_rawvideo_and_loops_forever() {
    let sink = GifSink::new(GifSinkOpts::new("out/banner.gif", Canvas::BANNER));
    let cfg = SinkConfig {
        width: 2400,
        height: 600,
        fps: 24,
    };
    let cmd = sink.command(&cfg);
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(cmd.get_program(), "ffmpeg");
    assert!(args.windows(2).any(|w| w == ["-s", "2400x600"]));
    assert!(args.windows(2).any(|w| w == ["-loop", "0"]));
    assert!(args.windows(2).any(|w| w == ["-i", "pipe:0"]));
    assert_eq!(args.last().map(String::as_str), Some("out/banner.gif"));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = GifSink::new(GifSinkOpts::new("x.gif", Canvas::BANNER));
    assert!(sink.push_frame(0, &solid(2, 2, [0, 0, 0, 255])).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn zero_fps_is_rejected() {
    let mut sink = GifSink::new(GifSinkOpts::new("x.gif", Canvas::BANNER));
    let err = sink
        .begin(SinkConfig {
            width: 4,
            height: 4,
            fps: 0,
        })
        .unwrap_err();
    assert!(err.to_string().contains("fps"));
}

#[test]
fn encodes_a_small_loop_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/loop.gif");
    let mut sink = GifSink::new(
        GifSinkOpts::new(&out, Canvas::new(16, 8).unwrap()).with_timeout(Duration::from_secs(60)),
    );
    sink.begin(SinkConfig {
        width: 32,
        height: 16,
        fps: 10,
    })
    .unwrap();
    for i in 0..4u32 {
        let v = (i * 60) as u8;
        sink.push_frame(i, &solid(32, 16, [v, 255 - v, 40, 255])).unwrap();
    }
    let err = sink.push_frame(2, &solid(32, 16, [0, 0, 0, 255])).unwrap_err();
    assert!(err.to_string().contains("out-of-order"));
    let err = sink.push_frame(9, &solid(8, 8, [0, 0, 0, 255])).unwrap_err();
    assert!(err.to_string().contains("size mismatch"));
    sink.end().unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}

#[cfg(unix)]
#[test]
fn stalled_encoder_times_out_while_frames_stream() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = GifSink::new(
        GifSinkOpts::new(dir.path().join("stall.gif"), Canvas::BANNER)
            .with_timeout(Duration::from_millis(500)),
    );
    let cfg = SinkConfig {
        width: 2400,
        height: 600,
        fps: 24,
    };
    // Stands in for an encoder that stops reading its input.
    let mut cmd = Command::new("sleep");
    cmd.arg("30")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    sink.spawn_encoder(cmd, cfg).unwrap();

    let started = std::time::Instant::now();
    let frame = solid(2400, 600, [10, 20, 30, 255]);
    let mut result = Ok(());
    for i in 0..8 {
        result = sink.push_frame(i, &frame);
        if result.is_err() {
            break;
        }
    }
    let err = result.unwrap_err();
    assert!(matches!(err, BannerError::Timeout { .. }), "{err}");
    assert!(started.elapsed() < Duration::from_secs(15));
    assert!(sink.end().is_err());
}
