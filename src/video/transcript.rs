//! Transcript acquisition.
//!
//! Four methods, tried strictly in order, each a self-contained attempt:
//! the transcript-panel endpoint (with retries), a caption-track URL from
//! the player-info endpoint, a caption-track URL scraped from the watch
//! page, and a fixed fallback captions URL. Whichever succeeds first is
//! parsed as XML, then JSON. Failures are swallowed into a diagnostic
//! string; a missing transcript is not an import error.

use crate::config::VideoConfig;
use crate::fetch::Fetcher;
use crate::model::TranscriptSegment;
use crate::text;
use log::{debug, warn};
use regex::Regex;
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::sleep;

static TRANSCRIPT_PARAMS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""getTranscriptEndpoint"\s*:\s*\{\s*"params"\s*:\s*"([^"]+)""#)
        .expect("transcript params regex")
});

static CAPTION_TRACK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""captionTracks"\s*:\s*\[\s*\{[^\]]*?"baseUrl"\s*:\s*"([^"]+)""#)
        .expect("caption track regex")
});

static XML_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text start="([\d.]+)"[^>]*>(.*?)</text>"#).expect("xml text regex")
});

/// The result of the acquisition chain: possibly empty segments plus an
/// internal diagnostic describing what failed along the way
pub struct TranscriptOutcome {
    pub segments: Vec<TranscriptSegment>,
    pub diagnostic: Option<String>,
}

pub async fn fetch_transcript(
    fetcher: &dyn Fetcher,
    config: &VideoConfig,
    watch_html: &str,
    video_id: &str,
) -> TranscriptOutcome {
    let mut failures: Vec<String> = Vec::new();

    match transcript_panel_attempt(fetcher, config, watch_html).await {
        Ok(segments) if !segments.is_empty() => {
            return TranscriptOutcome {
                segments,
                diagnostic: None,
            }
        }
        Ok(_) => failures.push("transcript panel: empty response".to_string()),
        Err(reason) => failures.push(format!("transcript panel: {reason}")),
    }

    match player_info_attempt(fetcher, config, video_id).await {
        Ok(segments) if !segments.is_empty() => {
            return TranscriptOutcome {
                segments,
                diagnostic: None,
            }
        }
        Ok(_) => failures.push("player info: no segments".to_string()),
        Err(reason) => failures.push(format!("player info: {reason}")),
    }

    match direct_caption_attempt(fetcher, watch_html).await {
        Ok(segments) if !segments.is_empty() => {
            return TranscriptOutcome {
                segments,
                diagnostic: None,
            }
        }
        Ok(_) => failures.push("direct caption url: no segments".to_string()),
        Err(reason) => failures.push(format!("direct caption url: {reason}")),
    }

    match fallback_url_attempt(fetcher, config, video_id).await {
        Ok(segments) if !segments.is_empty() => {
            return TranscriptOutcome {
                segments,
                diagnostic: None,
            }
        }
        Ok(_) => failures.push("fallback timedtext url: no segments".to_string()),
        Err(reason) => failures.push(format!("fallback timedtext url: {reason}")),
    }

    warn!("No transcript acquired: {}", failures.join("; "));
    TranscriptOutcome {
        segments: Vec::new(),
        diagnostic: Some(failures.join("; ")),
    }
}

/// Method 1: the transcript-panel parameter from the page, POSTed to the
/// transcript endpoint. Retried with a linearly increasing delay.
async fn transcript_panel_attempt(
    fetcher: &dyn Fetcher,
    config: &VideoConfig,
    watch_html: &str,
) -> Result<Vec<TranscriptSegment>, String> {
    let params = TRANSCRIPT_PARAMS_REGEX
        .captures(watch_html)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| "no transcript params on the page".to_string())?;

    let body = json!({
        "context": {
            "client": {
                "clientName": config.client_name,
                "clientVersion": config.client_version,
                "hl": "en",
            }
        },
        "params": params,
    });
    let url = format!("{}/youtubei/v1/get_transcript", config.api_base);

    let mut last_error = String::new();
    for attempt in 1..=config.transcript_retries {
        debug!(
            "Transcript endpoint attempt {attempt}/{}",
            config.transcript_retries
        );
        match fetcher.post_json(&url, &body, HeaderMap::new()).await {
            Ok(response) if response.is_success() => {
                let payload: Value = serde_json::from_slice(&response.body)
                    .map_err(|e| format!("bad transcript JSON: {e}"))?;
                return Ok(segments_from_panel(&payload));
            }
            Ok(response) => last_error = format!("status {}", response.status),
            Err(e) => last_error = e.to_string(),
        }
        if attempt < config.transcript_retries {
            sleep(Duration::from_millis(
                config.retry_delay_ms * u64::from(attempt),
            ))
            .await;
        }
    }
    Err(last_error)
}

/// Method 2: a fresh caption-track URL from the player-info endpoint.
/// Two response shapes are known: captions nested under the tracklist
/// renderer, and a bare top-level captionTracks array.
async fn player_info_attempt(
    fetcher: &dyn Fetcher,
    config: &VideoConfig,
    video_id: &str,
) -> Result<Vec<TranscriptSegment>, String> {
    if video_id.is_empty() {
        return Err("no video id".to_string());
    }
    let body = json!({
        "context": {
            "client": {
                "clientName": config.client_name,
                "clientVersion": config.client_version,
                "hl": "en",
            }
        },
        "videoId": video_id,
    });
    let url = format!("{}/youtubei/v1/player", config.api_base);
    let response = fetcher
        .post_json(&url, &body, HeaderMap::new())
        .await
        .map_err(|e| e.to_string())?;
    if !response.is_success() {
        return Err(format!("status {}", response.status));
    }
    let payload: Value =
        serde_json::from_slice(&response.body).map_err(|e| format!("bad player JSON: {e}"))?;

    let track_url = payload
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks/0/baseUrl")
        .and_then(Value::as_str)
        .or_else(|| {
            payload
                .pointer("/captionTracks/0/baseUrl")
                .and_then(Value::as_str)
        })
        .ok_or_else(|| "no caption tracks in player response".to_string())?;

    fetch_caption_url(fetcher, track_url).await
}

/// Method 3: a caption-track URL scraped straight off the watch page
async fn direct_caption_attempt(
    fetcher: &dyn Fetcher,
    watch_html: &str,
) -> Result<Vec<TranscriptSegment>, String> {
    let url = CAPTION_TRACK_REGEX
        .captures(watch_html)
        .map(|caps| unescape_json_url(&caps[1]))
        .ok_or_else(|| "no caption track url on the page".to_string())?;
    fetch_caption_url(fetcher, &url).await
}

/// Method 4: the fixed timedtext URL
async fn fallback_url_attempt(
    fetcher: &dyn Fetcher,
    config: &VideoConfig,
    video_id: &str,
) -> Result<Vec<TranscriptSegment>, String> {
    if video_id.is_empty() {
        return Err("no video id".to_string());
    }
    let url = format!("{}/api/timedtext?lang=en&v={video_id}", config.api_base);
    fetch_caption_url(fetcher, &url).await
}

async fn fetch_caption_url(
    fetcher: &dyn Fetcher,
    url: &str,
) -> Result<Vec<TranscriptSegment>, String> {
    let response = fetcher
        .get(url, HeaderMap::new())
        .await
        .map_err(|e| e.to_string())?;
    if !response.is_success() {
        return Err(format!("status {}", response.status));
    }
    let body = response.text();
    parse_caption_payload(&body).ok_or_else(|| "unrecognized caption payload".to_string())
}

/// Try the XML shape, then the JSON shape, in that order
pub fn parse_caption_payload(payload: &str) -> Option<Vec<TranscriptSegment>> {
    let xml_segments: Vec<TranscriptSegment> = XML_TEXT_REGEX
        .captures_iter(payload)
        .filter_map(|caps| {
            let start: f64 = caps[1].parse().ok()?;
            let content = text::normalize(&caps[2]);
            if content.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text: content,
                start_offset: start,
            })
        })
        .collect();
    if !xml_segments.is_empty() {
        return Some(xml_segments);
    }

    let json: Value = serde_json::from_str(payload).ok()?;
    let events = json.get("events")?.as_array()?;
    let mut segments = Vec::new();
    for event in events {
        let Some(start_ms) = event.get("tStartMs").and_then(Value::as_f64) else {
            continue;
        };
        let Some(segs) = event.get("segs").and_then(Value::as_array) else {
            continue;
        };
        let content: String = segs
            .iter()
            .filter_map(|seg| seg.get("utf8").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
        let content = text::normalize(&content);
        if !content.is_empty() {
            segments.push(TranscriptSegment {
                text: content,
                start_offset: start_ms / 1000.0,
            });
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Pull transcript segments out of the panel response, wherever the
/// renderer nests them
fn segments_from_panel(payload: &Value) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    collect_segment_renderers(payload, &mut segments);
    segments.sort_by(|a, b| a.start_offset.total_cmp(&b.start_offset));
    segments
}

fn collect_segment_renderers(value: &Value, segments: &mut Vec<TranscriptSegment>) {
    match value {
        Value::Object(obj) => {
            if let Some(renderer) = obj.get("transcriptSegmentRenderer") {
                if let Some(segment) = segment_from_renderer(renderer) {
                    segments.push(segment);
                }
            }
            for (_, nested) in obj {
                collect_segment_renderers(nested, segments);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_segment_renderers(item, segments);
            }
        }
        _ => {}
    }
}

fn segment_from_renderer(renderer: &Value) -> Option<TranscriptSegment> {
    let start_ms: f64 = match renderer.get("startMs")? {
        Value::String(s) => s.parse().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    let runs = renderer.pointer("/snippet/runs")?.as_array()?;
    let content: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let content = text::normalize(&content);
    if content.is_empty() {
        return None;
    }
    Some(TranscriptSegment {
        text: content,
        start_offset: start_ms / 1000.0,
    })
}

fn unescape_json_url(url: &str) -> String {
    url.replace("\\u0026", "&").replace("\\/", "/")
}
