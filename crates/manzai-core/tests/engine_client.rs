//! Engine client and render pipeline against an in-process fake engine

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use manzai_core::audio::AudioEncoder;
use manzai_core::{
    AppConfig, ClipSpec, ClipSynthesizer, EngineConfig, Error, ManzaiScript, ScriptRenderer,
    VoicevoxClient,
};

/// Speaker that fails at `/audio_query`
const BROKEN_QUERY_SPEAKER: u32 = 99;
/// Speaker that fails at `/synthesis`
const BROKEN_SYNTHESIS_SPEAKER: u32 = 98;
const RATE: u32 = 24000;

type Received = Arc<Mutex<Vec<Value>>>;

async fn audio_query(Query(params): Query<HashMap<String, String>>) -> Response {
    let speaker: u32 = params["speaker"].parse().unwrap();
    if speaker == BROKEN_QUERY_SPEAKER {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "accent_phrases": [],
        "speedScale": 1.0,
        "volumeScale": 1.0,
        "prePhonemeLength": 0.1,
        "postPhonemeLength": 0.1,
        "outputSamplingRate": RATE,
        "kana": params["text"],
    }))
    .into_response()
}

/// Answers with `speaker * 0.1` seconds of audio.
async fn synthesis(
    State(received): State<Received>,
    Query(params): Query<HashMap<String, String>>,
    Json(query): Json<Value>,
) -> Response {
    let speaker: u32 = params["speaker"].parse().unwrap();
    received.lock().unwrap().push(query);
    if speaker == BROKEN_SYNTHESIS_SPEAKER {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad query").into_response();
    }

    let samples = vec![0.1f32; speaker as usize * (RATE as usize / 10)];
    let wav = AudioEncoder::mono(RATE)
        .encode(&samples)
        .unwrap();
    ([(header::CONTENT_TYPE, "audio/wav")], wav).into_response()
}

async fn version() -> Json<&'static str> {
    Json("0.14.0")
}

async fn spawn_engine() -> (EngineConfig, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/audio_query", post(audio_query))
        .route("/synthesis", post(synthesis))
        .route("/version", get(version))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = EngineConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
        max_concurrent_requests: 2,
    };
    (config, received)
}

fn script(voices: Vec<ClipSpec>) -> ManzaiScript {
    ManzaiScript {
        title: "test".to_string(),
        combi_name: "duo".to_string(),
        left_chara: "left".to_string(),
        right_chara: "right".to_string(),
        left_chara_path: "l.png".to_string(),
        right_chara_path: "r.png".to_string(),
        voices,
    }
}

#[tokio::test]
async fn test_synthesize_patches_query_and_clamps_pre_roll() {
    let (config, received) = spawn_engine().await;
    let client = VoicevoxClient::new(&config).unwrap();

    let mut clip = ClipSpec::new("なんでやねん", 5).with_pre_phoneme_length(-0.7);
    clip.speed_scale = 1.25;
    clip.intonation_scale = 1.5;
    clip.post_phoneme_length = 0.3;

    let wav = client.synthesize(&clip).await.unwrap();
    let (samples, rate) = manzai_core::audio::decode_wav(&wav).unwrap();
    assert_eq!(rate, RATE);
    assert_eq!(samples.len(), 12000);

    let received = received.lock().unwrap();
    let query = &received[0];
    assert_eq!(query["kana"], "なんでやねん");
    assert_eq!(query["speedScale"], 1.25);
    assert_eq!(query["volumeScale"], 2.0);
    assert_eq!(query["intonationScale"], 1.5);
    assert_eq!(query["prePhonemeLength"], 0.0);
    assert_eq!(query["postPhonemeLength"], 0.3);
}

#[tokio::test]
async fn test_non_200_responses_are_engine_errors() {
    let (config, _) = spawn_engine().await;
    let client = VoicevoxClient::new(&config).unwrap();

    let err = client
        .synthesize(&ClipSpec::new("a", BROKEN_QUERY_SPEAKER))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::EngineStatus {
            endpoint: "audio_query",
            status: 500
        }
    ));

    let err = client
        .synthesize(&ClipSpec::new("a", BROKEN_SYNTHESIS_SPEAKER))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::EngineStatus {
            endpoint: "synthesis",
            status: 422
        }
    ));
}

#[tokio::test]
async fn test_version_probe() {
    let (config, _) = spawn_engine().await;
    let client = VoicevoxClient::new(&config).unwrap();
    assert_eq!(client.health().await.unwrap(), "0.14.0");
}

#[tokio::test]
async fn test_unreachable_engine() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = EngineConfig {
        base_url: format!("http://{}", addr),
        ..Default::default()
    };
    let client = VoicevoxClient::new(&config).unwrap();

    let err = client.version().await.unwrap_err();
    assert!(err.is_engine_unavailable());
}

#[tokio::test]
async fn test_render_script_end_to_end() {
    let (engine, received) = spawn_engine().await;
    let config = AppConfig {
        engine: engine.clone(),
        storage: manzai_core::StorageConfig {
            export_dir: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let client = VoicevoxClient::new(&engine).unwrap();
    let renderer = ScriptRenderer::new(Arc::new(client), &config);

    // 1.0s, then 0.5s gap + 0.5s, then 0.2s overlapping the tail
    let rendered = renderer
        .render(&script(vec![
            ClipSpec::new("どうも", 10),
            ClipSpec::new("よろしく", 5).with_pre_phoneme_length(0.5),
            ClipSpec::new("ええ", 2).with_pre_phoneme_length(-0.3),
        ]))
        .await
        .unwrap();

    let times: Vec<(f64, f64)> = rendered
        .metadata
        .voices
        .iter()
        .map(|v| (v.start, v.end))
        .collect();
    assert_eq!(times, vec![(0.0, 1.0), (1.5, 2.0), (1.7, 1.9)]);
    assert_eq!(rendered.duration, 2.0);
    assert_eq!(rendered.metadata.voices[2].clip.text, "ええ");
    assert_eq!(received.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_render_reports_failing_clip_index() {
    let (engine, _) = spawn_engine().await;
    let config = AppConfig {
        engine: engine.clone(),
        storage: manzai_core::StorageConfig {
            export_dir: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let renderer = ScriptRenderer::new(Arc::new(VoicevoxClient::new(&engine).unwrap()), &config);

    let err = renderer
        .render(&script(vec![
            ClipSpec::new("ok", 1),
            ClipSpec::new("broken", BROKEN_SYNTHESIS_SPEAKER),
        ]))
        .await
        .unwrap_err();

    match err {
        Error::ClipSynthesis { index, .. } => assert_eq!(index, 1),
        other => panic!("unexpected error: {other}"),
    }
}
