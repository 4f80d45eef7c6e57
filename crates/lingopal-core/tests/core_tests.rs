use lingopal_core::config::Settings;
use lingopal_core::*;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.openai.max_tokens, 1000);
    assert_eq!(settings.openai.temperature, 0.7);
    assert_eq!(settings.openai.timeout, 30);
    assert!(settings.openai.api_key.is_empty());

    assert_eq!(settings.conversation.max_history_length, 40);
    assert_eq!(settings.conversation.recent_history_count, 10);
    assert!(settings.conversation.enable_translation);
    assert!(settings.conversation.auto_save_history);

    assert!(settings
        .filter
        .inappropriate_keywords
        .contains(&"gambling".to_string()));
    assert!(settings.ui.show_english);
    assert!(settings.ui.show_chinese);
    assert!(!settings.ui.show_timestamps);
    assert_eq!(settings.ui.language, "zh-CN");
}

#[test]
fn test_settings_load_from_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load_from(&temp_dir.path().join("config.json"));
    assert_eq!(settings.openai.model, Settings::default().openai.model);
}

#[test]
fn test_settings_load_from_garbage_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "this is not json").unwrap();

    let settings = Settings::load_from(&path);
    assert_eq!(settings.conversation.max_history_length, 40);
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut settings = Settings::default();
    settings.openai.model = "test-model".to_string();
    settings.conversation.max_history_length = 12;
    settings.ui.show_timestamps = true;
    settings.save_to(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    for section in ["\"openai\"", "\"conversation\"", "\"filter\"", "\"ui\""] {
        assert!(raw.contains(section), "missing section {section}");
    }

    let loaded = Settings::load_from(&path);
    assert_eq!(loaded.openai.model, "test-model");
    assert_eq!(loaded.conversation.max_history_length, 12);
    assert!(loaded.ui.show_timestamps);
}

#[test]
fn test_config_path_prefers_explicit() {
    let explicit = std::path::Path::new("/tmp/custom-lingopal.json");
    assert_eq!(Settings::config_path(Some(explicit)), explicit);
}

// ========================================================================
// ConversationHistory Tests (context/history.rs)
// ========================================================================

fn history_in(dir: &TempDir, max: usize, auto_save: bool) -> ConversationHistory {
    ConversationHistory::new()
        .with_max_turns(max)
        .with_store(HistoryFile::new(dir.path().join("history.json")))
        .with_auto_save(auto_save)
}

#[test]
fn test_history_bound_keeps_most_recent_in_order() {
    let mut history = ConversationHistory::new().with_max_turns(3);

    for i in 1..=5 {
        history.append(TurnRole::User, format!("Message {i}"));
    }

    let contents: Vec<&str> = history.turns().iter().map(Turn::content).collect();
    assert_eq!(contents, vec!["Message 3", "Message 4", "Message 5"]);
    assert_eq!(history.len(), 3);
}

#[test]
fn test_history_bound_holds_for_many_lengths() {
    for max in 1..6 {
        for n in 0..12 {
            let mut history = ConversationHistory::new().with_max_turns(max);
            for i in 0..n {
                history.append(TurnRole::Assistant, i.to_string());
            }
            assert_eq!(history.len(), n.min(max));
            if n > 0 {
                assert_eq!(history.last_turn().unwrap().content(), (n - 1).to_string());
            }
        }
    }
}

#[test]
fn test_window_returns_last_min_k_l() {
    let mut history = ConversationHistory::new();
    for i in 0..6 {
        history.append(TurnRole::User, format!("t{i}"));
    }

    for k in 0..10 {
        let window = history.window(k);
        let expected = k.min(6);
        assert_eq!(window.len(), expected);
        assert_eq!(window, &history.turns()[6 - expected..]);
    }
    assert_eq!(history.len(), 6);
}

#[test]
fn test_timestamps_are_monotonic() {
    let mut history = ConversationHistory::new();
    history.append(TurnRole::User, "a");
    history.append(TurnRole::Assistant, "b");
    let turns = history.turns();
    assert!(turns[0].timestamp() <= turns[1].timestamp());
}

// ========================================================================
// Persistence Tests (context/persistence.rs)
// ========================================================================

#[test]
fn test_roundtrip_empty_store() {
    let dir = TempDir::new().unwrap();
    let history = history_in(&dir, 4, false);
    history.save().unwrap();

    let mut reloaded = history_in(&dir, 4, false);
    assert_eq!(reloaded.load().unwrap(), 0);
    assert!(reloaded.is_empty());
}

#[test]
fn test_roundtrip_single_turn() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 4, false);
    history.append(TurnRole::User, "Hello, 世界");
    history.save().unwrap();

    let mut reloaded = history_in(&dir, 4, false);
    reloaded.load().unwrap();
    assert_eq!(reloaded.turns(), history.turns());
}

#[test]
fn test_roundtrip_at_max_length() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 4, false);
    for i in 0..7 {
        let role = if i % 2 == 0 { TurnRole::User } else { TurnRole::Assistant };
        history.append(role, format!("turn {i}"));
    }
    assert_eq!(history.len(), 4);
    history.save().unwrap();

    let mut reloaded = history_in(&dir, 4, false);
    assert_eq!(reloaded.load().unwrap(), 4);
    assert_eq!(reloaded.turns(), history.turns());
}

#[test]
fn test_auto_save_writes_every_append() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 10, true);
    history.append(TurnRole::User, "one");
    history.append(TurnRole::Assistant, "two");

    let on_disk = HistoryFile::new(dir.path().join("history.json")).load().unwrap();
    assert_eq!(on_disk.len(), 2);
    assert_eq!(on_disk[1].content(), "two");
}

#[test]
fn test_without_auto_save_nothing_is_written() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 10, false);
    history.append(TurnRole::User, "one");
    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn test_load_truncates_to_max() {
    let dir = TempDir::new().unwrap();
    let mut big = history_in(&dir, 10, false);
    for i in 0..8 {
        big.append(TurnRole::User, i.to_string());
    }
    big.save().unwrap();

    let mut small = history_in(&dir, 3, false);
    assert_eq!(small.load().unwrap(), 3);
    assert_eq!(small.turns()[0].content(), "5");
}

#[test]
fn test_load_corrupt_file_resets_to_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("history.json"), "[{\"role\": 7}]").unwrap();

    let mut history = history_in(&dir, 10, false);
    history.append(TurnRole::User, "in memory");
    assert!(history.load().is_err());
    assert!(history.is_empty());
}

#[test]
fn test_save_failure_keeps_memory_valid() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be makes every write fail.
    let blocked = dir.path().join("history.json");
    std::fs::create_dir_all(blocked.join("child")).unwrap();

    let mut history = ConversationHistory::new()
        .with_store(HistoryFile::new(&blocked))
        .with_auto_save(true);
    history.append(TurnRole::User, "still here");

    assert_eq!(history.len(), 1);
    assert!(history.save().is_err());
}

#[test]
fn test_clear_empties_and_deletes_file() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 10, true);
    history.append(TurnRole::User, "one");
    assert!(dir.path().join("history.json").exists());

    history.clear().unwrap();
    assert_eq!(history.len(), 0);
    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn test_clear_without_file_is_ok() {
    let dir = TempDir::new().unwrap();
    let mut history = history_in(&dir, 10, false);
    history.append(TurnRole::User, "one");
    history.clear().unwrap();
    assert!(history.is_empty());
}

// ========================================================================
// Export Tests (context/export.rs)
// ========================================================================

#[test]
fn test_export_transcript_writes_file() {
    let dir = TempDir::new().unwrap();
    let mut history = ConversationHistory::new();
    history.append(TurnRole::User, "What is a gerund?");
    history.append(TurnRole::Assistant, "A verb form ending in -ing.");

    let path = dir.path().join("out.txt");
    context::export_transcript(history.turns(), &path, false).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("You: What is a gerund?"));
    assert!(text.contains("AI: A verb form ending in -ing."));
}
