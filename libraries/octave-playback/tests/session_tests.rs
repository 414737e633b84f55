//! End-to-end behaviour of a player session over in-memory fakes

mod common;

use common::{ids, track, tracks, FakeApi, Harness, MemoryBlobs, MemorySettings};
use octave_core::{AudioQuality, LyricsResponse, MediaSource, RepeatMode, LIKED_SONGS};
use octave_playback::{LoadOutcome, PlaybackState, PlayerEvent, QueueSelection};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn skip_conserves_tracks() {
    let mut h = Harness::new().await;
    assert!(h.session.replace_queue(tracks(&["a", "b", "c"])).await);

    let total = |h: &Harness| h.session.history().len() + h.session.display_queue().len();
    assert_eq!(total(&h), 3);

    assert!(h.session.skip_track().await);

    assert_eq!(h.current_id().as_deref(), Some("b"));
    assert_eq!(ids(h.session.up_next()), vec!["c"]);
    assert_eq!(h.session.history().peek().unwrap().id, "a");
    assert_eq!(total(&h), 3);
}

#[tokio::test]
async fn queue_plays_through_then_stops() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b", "c"])).await;

    h.finish_track().await;
    assert_eq!(h.current_id().as_deref(), Some("b"));
    h.finish_track().await;
    assert_eq!(h.current_id().as_deref(), Some("c"));
    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("c"));
    assert_eq!(h.session.state(), PlaybackState::Idle);
    assert!(!h.media.lock().unwrap().playing);
    assert_eq!(
        h.media.lock().unwrap().loaded_urls(),
        vec![
            "http://api.test/api/track/a.mp3",
            "http://api.test/api/track/b.mp3",
            "http://api.test/api/track/c.mp3",
        ]
    );
}

#[tokio::test]
async fn single_track_stops_and_counts_listen() {
    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();

    h.finish_track().await;

    assert_eq!(h.session.state(), PlaybackState::Idle);
    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert!(h.session.history().is_empty());
    assert_eq!(h.session.listen_count("a"), 1);
}

#[tokio::test]
async fn add_to_queue_drops_duplicates() {
    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();
    assert_eq!(h.session.add_to_queue(tracks(&["b", "c"])).await, 2);

    let added = h.session.add_to_queue(tracks(&["a", "c", "d", "d"])).await;

    assert_eq!(added, 1);
    let display = h.session.display_queue();
    assert_eq!(ids(&display), vec!["a", "b", "c", "d"]);
    let unique: HashSet<_> = display.iter().map(|t| &t.id).collect();
    assert_eq!(unique.len(), display.len());
}

#[tokio::test]
async fn cached_track_plays_offline() {
    let blobs = Arc::new(MemoryBlobs::default());
    blobs
        .blobs
        .lock()
        .unwrap()
        .insert("42".to_string(), b"cached-audio".to_vec());
    let mut h =
        Harness::with_blobs(FakeApi::default(), Arc::new(MemorySettings::default()), blobs).await;

    let outcome = h.session.play_track(track("42")).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Started);
    let log = h.media.lock().unwrap();
    match &log.loaded[0] {
        MediaSource::Offline { track_id, bytes } => {
            assert_eq!(track_id, "42");
            assert_eq!(&bytes[..], b"cached-audio");
        }
        other => panic!("expected offline source, got {other:?}"),
    }
}

#[tokio::test]
async fn repeat_one_replays_without_moving_queue() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b"])).await;
    h.session.set_repeat_mode(RepeatMode::One).await;
    h.session.seek(95.0).await;

    h.finish_track().await;
    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(ids(h.session.up_next()), vec!["b"]);
    assert!(h.session.history().is_empty());
    assert_eq!(h.session.state(), PlaybackState::Playing);
    assert_eq!(h.media.lock().unwrap().position, 0.0);
    assert_eq!(h.media.lock().unwrap().loaded.len(), 1);
    assert_eq!(h.session.listen_count("a"), 2);
}

#[tokio::test]
async fn repeat_all_wraps_to_start() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b", "c"])).await;
    h.session.set_repeat_mode(RepeatMode::All).await;

    h.finish_track().await;
    h.finish_track().await;
    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(ids(h.session.up_next()), vec!["b", "c"]);
    assert_eq!(h.session.state(), PlaybackState::Playing);
    for id in ["a", "b", "c"] {
        assert_eq!(h.session.listen_count(id), 1);
    }
}

#[tokio::test]
async fn repeat_all_wraps_to_replaced_queue_not_earlier_plays() {
    let mut h = Harness::new().await;
    h.session.play_track(track("x")).await.unwrap();
    h.session.replace_queue(tracks(&["a", "b"])).await;
    h.session.set_repeat_mode(RepeatMode::All).await;

    h.finish_track().await;
    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(ids(h.session.up_next()), vec!["b"]);
}

#[tokio::test]
async fn repeat_all_wraps_queue_longer_than_history() {
    let mut h = Harness::new().await;
    let names: Vec<String> = (0..60).map(|i| format!("t{i}")).collect();
    let queue: Vec<_> = names.iter().map(|id| track(id)).collect();
    h.session.replace_queue(queue).await;
    h.session.set_repeat_mode(RepeatMode::All).await;

    for _ in 0..60 {
        h.finish_track().await;
    }

    assert_eq!(h.current_id().as_deref(), Some("t0"));
    assert_eq!(h.session.up_next().len(), 59);
    assert!(h.session.history().len() <= 50);
}

#[tokio::test]
async fn wrap_context_survives_restart() {
    let settings = Arc::new(MemorySettings::default());
    {
        let mut h = Harness::with(FakeApi::default(), settings.clone()).await;
        h.session.replace_queue(tracks(&["a", "b", "c"])).await;
        h.session.skip_track().await;
        h.session.skip_track().await;
    }

    let mut h = Harness::with(FakeApi::default(), settings).await;
    h.session.set_repeat_mode(RepeatMode::All).await;
    h.session.toggle_play().await.unwrap();
    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(ids(h.session.up_next()), vec!["b", "c"]);
}

#[tokio::test]
async fn repeat_all_single_track_restarts() {
    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();
    h.session.set_repeat_mode(RepeatMode::All).await;

    h.finish_track().await;

    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(h.session.state(), PlaybackState::Playing);
    assert_eq!(h.media.lock().unwrap().loaded.len(), 1);
}

#[tokio::test]
async fn listen_counts_only_on_natural_end() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b", "c"])).await;

    h.session.skip_track().await;
    assert_eq!(h.session.listen_count("a"), 0);

    h.finish_track().await;
    assert_eq!(h.session.listen_count("b"), 1);

    h.session.previous_track().await;
    h.session.select(QueueSelection::upcoming(0)).await;
    assert_eq!(h.session.listen_count("b"), 1);
    assert_eq!(h.session.listen_count("c"), 0);

    let stored = h.settings.raw("listenCounts").unwrap();
    assert_eq!(stored, r#"{"b":1}"#);
}

#[tokio::test]
async fn rejected_navigation_emits_notice() {
    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();
    h.session.drain_events();

    assert!(!h.session.skip_track().await);
    assert!(!h.session.previous_track().await);
    assert!(!h.session.select(QueueSelection::history(4)).await);

    let notices = h
        .session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlayerEvent::Notice { .. }))
        .count();
    assert_eq!(notices, 3);
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[tokio::test]
async fn failed_load_pauses_and_reports() {
    let mut h = Harness::new().await;
    h.media.lock().unwrap().fail_next_load = true;

    let result = h.session.play_track(track("a")).await;

    assert!(result.is_err());
    assert_eq!(h.session.state(), PlaybackState::Paused);
    assert!(h
        .session
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::Error { .. })));
    // The track is still current and can be retried
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[tokio::test]
async fn toggle_play_after_failed_load_retries_the_track() {
    let mut h = Harness::new().await;
    h.media.lock().unwrap().fail_next_load = true;
    assert!(h.session.play_track(track("a")).await.is_err());

    assert_eq!(h.session.toggle_play().await.unwrap(), PlaybackState::Playing);

    let log = h.media.lock().unwrap();
    assert_eq!(log.loaded_urls(), vec!["http://api.test/api/track/a.mp3"]);
    assert!(log.playing);
}

#[tokio::test]
async fn events_describe_track_and_state_changes() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b"])).await;
    h.session.skip_track().await;

    let events = h.session.drain_events();
    assert!(events.contains(&PlayerEvent::TrackChanged {
        track_id: "a".into(),
        previous_track_id: None,
    }));
    assert!(events.contains(&PlayerEvent::TrackChanged {
        track_id: "b".into(),
        previous_track_id: Some("a".into()),
    }));
    assert!(events.contains(&PlayerEvent::StateChanged {
        state: PlaybackState::Playing,
    }));
    assert!(h.session.drain_events().is_empty());
}

#[tokio::test]
async fn toggle_play_pauses_and_resumes() {
    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();
    h.media.lock().unwrap().position = 61.0;

    assert_eq!(h.session.toggle_play().await.unwrap(), PlaybackState::Paused);
    assert_eq!(h.session.settings().seek_position, 61.0);
    assert_eq!(h.settings.raw("seekPosition").as_deref(), Some("61.0"));

    assert_eq!(h.session.toggle_play().await.unwrap(), PlaybackState::Playing);
    assert!(h.media.lock().unwrap().playing);
}

#[tokio::test]
async fn toggle_play_after_cold_start_resumes_saved_position() {
    let settings = Arc::new(MemorySettings::default());
    settings.put("currentTrack", r#"{"id":"7","title":"Seven"}"#);
    settings.put("seekPosition", "42.5");
    let mut h = Harness::with(FakeApi::default(), settings).await;

    assert_eq!(h.session.state(), PlaybackState::Idle);
    assert_eq!(h.session.toggle_play().await.unwrap(), PlaybackState::Playing);

    let log = h.media.lock().unwrap();
    assert_eq!(log.loaded_urls(), vec!["http://api.test/api/track/7.mp3"]);
    assert_eq!(log.position, 42.5);
}

#[tokio::test]
async fn toggle_play_with_nothing_queued_fails() {
    let mut h = Harness::new().await;
    assert!(h.session.toggle_play().await.is_err());
}

#[tokio::test]
async fn recently_played_is_capped_and_deduplicated() {
    let mut h = Harness::new().await;
    for id in ["1", "2", "3", "2", "4", "5"] {
        h.session.play_track(track(id)).await.unwrap();
    }

    assert_eq!(
        ids(&h.session.settings().recently_played),
        vec!["5", "4", "2", "3"]
    );
}

#[tokio::test]
async fn settings_mutators_persist() {
    let mut h = Harness::new().await;

    assert_eq!(h.session.set_volume(1.5).await, 1.0);
    assert_eq!(h.media.lock().unwrap().volume, 1.0);
    assert_eq!(h.session.cycle_repeat_mode().await, RepeatMode::All);
    assert_eq!(h.session.cycle_audio_quality().await, AudioQuality::Normal);
    h.session.complete_onboarding().await;

    assert_eq!(h.settings.raw("volume").as_deref(), Some("1.0"));
    assert_eq!(h.settings.raw("repeatMode").as_deref(), Some(r#""all""#));
    assert_eq!(h.settings.raw("audioQuality").as_deref(), Some(r#""NORMAL""#));
    assert_eq!(h.settings.raw("onboardingDone").as_deref(), Some("true"));
}

#[tokio::test]
async fn toggle_shuffle_keeps_queue_members() {
    let mut h = Harness::new().await;
    h.session
        .replace_queue(tracks(&["a", "b", "c", "d", "e"]))
        .await;

    assert!(h.session.toggle_shuffle().await);

    let mut upcoming = ids(h.session.up_next());
    upcoming.sort_unstable();
    assert_eq!(upcoming, vec!["b", "c", "d", "e"]);
    assert_eq!(h.current_id().as_deref(), Some("a"));
    assert_eq!(h.settings.raw("shuffleOn").as_deref(), Some("true"));
}

#[tokio::test]
async fn like_current_track() {
    let mut h = Harness::new().await;
    assert_eq!(h.session.toggle_like(None).await, None);

    h.session.play_track(track("a")).await.unwrap();
    assert_eq!(h.session.toggle_like(None).await, Some(true));
    assert!(h.session.is_liked("a"));

    let stored = h.settings.raw("playlists").unwrap();
    assert!(stored.contains(LIKED_SONGS));
    assert!(stored.contains(r#""id":"a""#));
}

#[tokio::test]
async fn partial_playlist_download_is_not_marked_downloaded() {
    let api = FakeApi {
        unavailable: HashSet::from(["2".to_string()]),
        ..FakeApi::default()
    };
    let mut h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    h.session
        .create_playlist("Mix", tracks(&["1", "2", "3"]), None)
        .await
        .unwrap();

    let report = h.session.download_playlist("Mix").await.unwrap();

    assert_eq!(report.failed, vec!["2"]);
    assert!(!h.session.library().get("Mix").unwrap().downloaded);
    assert!(h.session.is_cached("1").await);
    assert!(!h.session.is_cached("2").await);
    assert!(h.session.is_cached("3").await);

    let progress: Vec<f64> = h
        .session
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            PlayerEvent::DownloadProgress { percent, .. } => Some(percent.round()),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![33.0, 67.0, 100.0]);
}

#[tokio::test]
async fn complete_playlist_download_is_persisted() {
    let mut h = Harness::new().await;
    h.session
        .create_playlist("Mix", tracks(&["1", "2"]), None)
        .await
        .unwrap();

    let report = h.session.download_playlist("Mix").await.unwrap();

    assert!(report.is_complete());
    assert!(h.session.library().get("Mix").unwrap().downloaded);
    assert!(h
        .settings
        .raw("playlists")
        .unwrap()
        .contains(r#""downloaded":true"#));

    // Playing it now uses the cached copy
    h.session.play_playlist("Mix").await;
    assert!(h.media.lock().unwrap().loaded[0].is_offline());
}

#[tokio::test]
async fn removing_a_download_clears_the_playlist_flag() {
    let mut h = Harness::new().await;
    h.session
        .create_playlist("Mix", tracks(&["1", "2"]), None)
        .await
        .unwrap();
    h.session.download_playlist("Mix").await.unwrap();

    assert!(h.session.remove_download("1").await.unwrap());

    assert!(!h.session.is_cached("1").await);
    assert!(h.session.is_cached("2").await);
    assert!(!h.session.library().get("Mix").unwrap().downloaded);
    assert!(!h
        .settings
        .raw("playlists")
        .unwrap()
        .contains(r#""downloaded":true"#));
    assert!(!h.session.remove_download("1").await.unwrap());
}

#[tokio::test]
async fn upcoming_offline_tracks_are_prepared_ahead() {
    let blobs = Arc::new(MemoryBlobs::default());
    blobs
        .blobs
        .lock()
        .unwrap()
        .insert("b".to_string(), b"cached-b".to_vec());
    let mut h = Harness::with_blobs(
        FakeApi::default(),
        Arc::new(MemorySettings::default()),
        blobs.clone(),
    )
    .await;
    h.session.replace_queue(tracks(&["a", "b"])).await;

    // Storage goes away after the queue was set up
    blobs.blobs.lock().unwrap().clear();
    assert!(h.session.skip_track().await);

    let log = h.media.lock().unwrap();
    assert!(!log.loaded[0].is_offline());
    assert!(log.loaded[1].is_offline());
}

#[tokio::test]
async fn download_unknown_playlist_fails() {
    let mut h = Harness::new().await;
    assert!(h.session.download_playlist("Nope").await.is_err());
}

#[tokio::test]
async fn synced_lyrics_are_loaded() {
    let api = FakeApi {
        lyrics: Some(LyricsResponse {
            success: true,
            synced: true,
            lyrics: "[00:05.00]Second\n[00:01.00]First".into(),
        }),
        ..FakeApi::default()
    };
    let mut h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    h.session.play_track(track("a")).await.unwrap();

    let lines = h.session.load_lyrics().await;

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "First");
    assert_eq!(lines[0].end_time, 5.0);
    assert_eq!(lines[1].end_time, 180.0);
}

#[tokio::test]
async fn unsynced_or_failed_lyrics_are_empty() {
    let api = FakeApi {
        lyrics: Some(LyricsResponse {
            success: true,
            synced: false,
            lyrics: "plain text".into(),
        }),
        ..FakeApi::default()
    };
    let mut h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    h.session.play_track(track("a")).await.unwrap();
    assert!(h.session.load_lyrics().await.is_empty());

    let mut h = Harness::new().await;
    h.session.play_track(track("a")).await.unwrap();
    assert!(h.session.load_lyrics().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn lyrics_ticker_follows_playhead() {
    let api = FakeApi {
        lyrics: Some(LyricsResponse {
            success: true,
            synced: true,
            lyrics: "[00:01.00]One\n[00:10.00]Two".into(),
        }),
        ..FakeApi::default()
    };
    let mut h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    h.session.play_track(track("a")).await.unwrap();
    h.session.load_lyrics().await;

    let (task, mut rx) = h.session.spawn_lyrics_ticker();
    assert_eq!(*rx.borrow(), None);

    h.media.lock().unwrap().position = 12.0;
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*rx.borrow(), Some(1));

    h.media.lock().unwrap().position = 2.0;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), Some(0));

    drop(rx);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn lyrics_ticker_tracks_lyrics_loaded_after_it_started() {
    let api = FakeApi {
        lyrics: Some(LyricsResponse {
            success: true,
            synced: true,
            lyrics: "[00:01.00]One\n[00:10.00]Two".into(),
        }),
        ..FakeApi::default()
    };
    let mut h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    h.session.play_track(track("a")).await.unwrap();

    let (_task, mut rx) = h.session.spawn_lyrics_ticker();
    h.session.load_lyrics().await;

    h.media.lock().unwrap().position = 12.0;
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*rx.borrow(), Some(1));
    assert_eq!(h.session.lyrics().index(), Some(1));
    assert_eq!(h.session.lyrics().current_line().unwrap().text, "Two");

    h.session.play_track(track("b")).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*rx.borrow(), None);
    assert!(h.session.lyrics().lines().is_empty());
}

#[tokio::test]
async fn search_filters_blank_queries() {
    let api = FakeApi {
        catalog: vec![
            octave_core::Track::new("1", "One More Time", "Daft Punk"),
            octave_core::Track::new("2", "Teardrop", "Massive Attack"),
        ],
        ..FakeApi::default()
    };
    let h = Harness::with(api, Arc::new(MemorySettings::default())).await;

    assert!(h.session.search("  ").await.is_empty());
    assert_eq!(ids(&h.session.search("daft").await), vec!["1"]);
}

#[tokio::test]
async fn queue_edits_are_persisted() {
    let mut h = Harness::new().await;
    h.session.replace_queue(tracks(&["a", "b", "c", "d"])).await;

    assert_eq!(h.session.remove_from_queue(1).await.unwrap().id, "c");
    assert!(h.session.remove_from_queue(9).await.is_none());
    assert_eq!(
        h.settings.raw("queue").map(|q| q.matches(r#""id""#).count()),
        Some(2)
    );

    h.session.clear_queue().await;
    assert!(h.session.up_next().is_empty());
    assert_eq!(h.settings.raw("queue").as_deref(), Some("[]"));
    assert_eq!(h.current_id().as_deref(), Some("a"));
}

#[tokio::test]
async fn playlist_management_round_trip() {
    let mut h = Harness::new().await;
    h.session
        .create_playlist("Focus", tracks(&["1"]), None)
        .await
        .unwrap();

    assert!(h.session.create_playlist("Focus", Vec::new(), None).await.is_err());
    assert!(h.session.create_playlist("  ", Vec::new(), None).await.is_err());
    assert!(h.session.add_to_playlist("Focus", &track("2")).await.unwrap());
    assert!(!h.session.add_to_playlist("Focus", &track("2")).await.unwrap());
    assert!(h.session.toggle_pin("Focus").await.unwrap());
    assert_eq!(
        h.session.library().display_order()[0].name,
        "Focus".to_string()
    );

    assert!(h.session.delete_playlist(LIKED_SONGS).await.is_err());
    let removed = h.session.delete_playlist("Focus").await.unwrap();
    assert_eq!(ids(&removed.tracks), vec!["1", "2"]);
    assert!(!h.settings.raw("playlists").unwrap().contains("Focus"));
}

#[tokio::test]
async fn smart_shuffle_pulls_in_the_dominant_artist() {
    let mut h = Harness::new().await;
    let mut mix = tracks(&["1", "2"]);
    mix.push(octave_core::Track::new("3", "Other", "Someone Else"));
    h.session.create_playlist("Mix", mix, None).await.unwrap();

    let candidates: Vec<_> = (10..20).map(|n| track(&n.to_string())).collect();
    h.session.smart_shuffle("Mix", &candidates).await.unwrap();

    let playlist = h.session.library().get("Mix").unwrap();
    assert_eq!(playlist.tracks.len(), 8);
    assert!(playlist.contains("3"));
    assert!(h.session.smart_shuffle("Missing", &candidates).await.is_err());
}

#[tokio::test]
async fn favorite_artists_are_persisted() {
    let mut h = Harness::new().await;
    h.session
        .set_favorite_artists(vec![octave_core::Artist::new("Daft Punk")])
        .await;

    assert_eq!(h.session.settings().favorite_artists.len(), 1);
    assert!(h
        .settings
        .raw("favoriteArtists")
        .unwrap()
        .contains("Daft Punk"));
}

#[tokio::test(start_paused = true)]
async fn session_debouncer_uses_configured_delay() {
    let api = FakeApi {
        catalog: vec![octave_core::Track::new("1", "Around the World", "Daft Punk")],
        ..FakeApi::default()
    };
    let h = Harness::with(api, Arc::new(MemorySettings::default())).await;
    let (debouncer, mut results) = h.session.search_debouncer();

    debouncer.submit("da");
    debouncer.submit("daft");

    let fired = results.recv().await.unwrap();
    assert_eq!(fired.query, "daft");
    assert_eq!(ids(&fired.tracks), vec!["1"]);
    assert!(results.try_recv().is_err());
}
