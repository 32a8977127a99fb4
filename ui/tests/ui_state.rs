use api_client::{Photo, PhotoUpdate, RebuildState, RebuildStatus, YearAlbum};
use iced::Application;
use serial_test::serial;
use tempfile::tempdir;
use ui::{AdminUI, Message, PreviewKind, StatusOption, YearOption};

fn sample_photo(filename: &str, year: &str, hidden: bool) -> Photo {
    Photo {
        filename: filename.to_string(),
        year: year.to_string(),
        date: format!("{}-06-01", year),
        width: 6000,
        height: 4000,
        alt: None,
        subject: Vec::new(),
        is_hidden: hidden,
        path: format!("https://r2.example.com/original/{}", filename),
        thumbnail: format!("https://r2.example.com/thumbnail/{}", filename),
    }
}

fn albums_with(count: usize) -> Vec<YearAlbum> {
    let photos = (0..count)
        .map(|i| sample_photo(&format!("DSC_{:04}.jpg", i), "2025", i % 5 == 0))
        .collect();
    vec![YearAlbum {
        year: "2025".into(),
        photos,
    }]
}

fn new_ui() -> (AdminUI, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let (ui, _) = AdminUI::new((
        "http://localhost:8081".to_string(),
        dir.path().to_path_buf(),
        4,
    ));
    (ui, dir)
}

#[test]
#[serial]
fn test_initial_state() {
    let (ui, _dir) = new_ui();
    assert_eq!(ui.photo_count(), 0);
    assert_eq!(ui.filtered_count(), 0);
    assert_eq!(ui.selection_count(), 0);
    assert!(!ui.is_virtual());
    assert_eq!(ui.state_debug(), "Grid");
}

#[test]
#[serial]
fn test_large_library_takes_virtual_path() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(250))));

    assert_eq!(ui.photo_count(), 250);
    assert_eq!(ui.filtered_count(), 250);
    assert!(ui.is_virtual());

    // 1280px window, 220px min card width: 5 per row, 50 rows of 320px.
    assert_eq!(ui.grid_total_height(), Some(50.0 * 320.0));

    let (start, end) = ui.visible_range();
    assert_eq!(start, 0);
    assert!(end <= 250);
    assert!(end > 0);
}

#[test]
#[serial]
fn test_small_library_takes_direct_path_without_spacer() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(50))));

    assert_eq!(ui.filtered_count(), 50);
    assert!(!ui.is_virtual());
    assert_eq!(ui.grid_total_height(), None);
    assert_eq!(ui.visible_range(), (0, 50));
}

#[test]
#[serial]
fn test_filter_crossing_threshold_switches_modes() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(250))));
    assert!(ui.is_virtual());

    // Narrowing below the threshold tears the virtual grid down.
    let _ = ui.update(Message::SearchChanged("DSC_000".into()));
    assert!(ui.filtered_count() <= 100);
    assert!(!ui.is_virtual());
    assert_eq!(ui.grid_total_height(), None);

    // Widening again rebuilds it.
    let _ = ui.update(Message::SearchChanged(String::new()));
    assert_eq!(ui.filtered_count(), 250);
    assert!(ui.is_virtual());
}

#[test]
#[serial]
fn test_year_and_status_filters() {
    let (mut ui, _dir) = new_ui();
    let mut albums = albums_with(10);
    albums.push(YearAlbum {
        year: "2024".into(),
        photos: vec![sample_photo("OLD_0001.jpg", "2024", false)],
    });
    let _ = ui.update(Message::PhotosLoaded(Ok(albums)));
    assert_eq!(ui.photo_count(), 11);

    let _ = ui.update(Message::YearPicked(YearOption(Some("2024".into()))));
    assert_eq!(ui.filtered_count(), 1);

    let _ = ui.update(Message::YearPicked(YearOption(None)));
    let _ = ui.update(Message::StatusPicked(StatusOption::Hidden));
    assert_eq!(ui.filtered_count(), 2); // indices 0 and 5

    let _ = ui.update(Message::StatusPicked(StatusOption::All));
    assert_eq!(ui.filtered_count(), 11);
}

#[test]
#[serial]
fn test_selection_survives_filter_changes() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));

    let _ = ui.update(Message::ToggleSelection("DSC_0003.jpg".into(), true));
    assert_eq!(ui.selection_count(), 1);

    // Filter the selected photo out of view; the selection stays.
    let _ = ui.update(Message::SearchChanged("DSC_0001".into()));
    assert!(ui.is_selected("DSC_0003.jpg"));

    let _ = ui.update(Message::ToggleSelection("DSC_0003.jpg".into(), false));
    assert_eq!(ui.selection_count(), 0);
}

#[test]
#[serial]
fn test_batch_update_applies_flags_and_clears_selection() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));

    let _ = ui.update(Message::ToggleSelection("DSC_0001.jpg".into(), true));
    let _ = ui.update(Message::ToggleSelection("DSC_0002.jpg".into(), true));

    let _ = ui.update(Message::BatchUpdated(Ok((
        vec!["DSC_0001.jpg".into(), "DSC_0002.jpg".into()],
        true,
    ))));

    assert_eq!(ui.photo_hidden("DSC_0001.jpg"), Some(true));
    assert_eq!(ui.photo_hidden("DSC_0002.jpg"), Some(true));
    assert_eq!(ui.photo_hidden("DSC_0003.jpg"), Some(false));
    assert_eq!(ui.selection_count(), 0);
}

#[test]
#[serial]
fn test_batch_failure_keeps_selection() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));
    let _ = ui.update(Message::ToggleSelection("DSC_0001.jpg".into(), true));

    let _ = ui.update(Message::BatchUpdated(Err("boom".into())));
    assert_eq!(ui.selection_count(), 1);
    assert_eq!(ui.error_count(), 1);
}

#[test]
#[serial]
fn test_detail_open_edit_save() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));

    let _ = ui.update(Message::ShowDetail("DSC_0002.jpg".into()));
    assert_eq!(ui.state_debug(), "Detail(DSC_0002.jpg)");

    let _ = ui.update(Message::DetailAltChanged("A new caption".into()));
    let _ = ui.update(Message::DetailHiddenToggled(true));

    let update = PhotoUpdate {
        alt: Some("A new caption".into()),
        is_hidden: Some(true),
        subject: Some(vec!["tag".into()]),
    };
    let _ = ui.update(Message::DetailSaved(Ok(("DSC_0002.jpg".into(), update))));

    assert_eq!(ui.state_debug(), "Grid");
    assert_eq!(ui.photo_hidden("DSC_0002.jpg"), Some(true));
}

#[test]
#[serial]
fn test_delete_removes_photo_everywhere() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));
    let _ = ui.update(Message::ToggleSelection("DSC_0004.jpg".into(), true));
    let _ = ui.update(Message::ShowDetail("DSC_0004.jpg".into()));

    let _ = ui.update(Message::PhotoDeleted(Ok("DSC_0004.jpg".into())));
    assert_eq!(ui.photo_count(), 9);
    assert_eq!(ui.filtered_count(), 9);
    assert_eq!(ui.selection_count(), 0);
    assert_eq!(ui.state_debug(), "Grid");
}

#[test]
#[serial]
fn test_rebuild_lifecycle() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::StartRebuild);
    assert_eq!(ui.rebuild_state(), Some(RebuildState::Running));

    let _ = ui.update(Message::RebuildStatusLoaded(Ok(RebuildStatus {
        status: RebuildState::Running,
        progress: 40,
        message: "Processing photos...".into(),
        logs: vec!["started".into()],
    })));
    assert_eq!(ui.rebuild_state(), Some(RebuildState::Running));

    let _ = ui.update(Message::RebuildStatusLoaded(Ok(RebuildStatus {
        status: RebuildState::Completed,
        progress: 100,
        message: "Rebuild completed successfully".into(),
        logs: vec![],
    })));
    assert_eq!(ui.rebuild_state(), Some(RebuildState::Completed));

    let _ = ui.update(Message::FinishRebuild);
    assert_eq!(ui.rebuild_state(), None);
}

#[test]
#[serial]
fn test_rebuild_start_failure_closes_modal() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::StartRebuild);
    let _ = ui.update(Message::RebuildStarted(Err("409 conflict".into())));
    assert_eq!(ui.rebuild_state(), None);
    assert_eq!(ui.error_count(), 1);
}

#[test]
#[serial]
fn test_preview_and_escape_cascade() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Ok(albums_with(10))));

    let _ = ui.update(Message::ShowPreview(
        "DSC_0001.jpg".into(),
        PreviewKind::Original,
    ));
    assert_eq!(
        ui.preview_title(),
        Some("Remote original: DSC_0001.jpg".to_string())
    );

    let _ = ui.update(Message::EscapePressed);
    assert_eq!(ui.preview_title(), None);

    let _ = ui.update(Message::ShowDetail("DSC_0001.jpg".into()));
    let _ = ui.update(Message::EscapePressed);
    assert_eq!(ui.state_debug(), "Grid");
}

#[test]
#[serial]
fn test_load_failure_surfaces_and_dismisses() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::PhotosLoaded(Err("connection refused".into())));
    assert_eq!(ui.error_count(), 1);

    let _ = ui.update(Message::DismissError(0));
    assert_eq!(ui.error_count(), 0);

    let _ = ui.update(Message::PhotosLoaded(Err("a".into())));
    let _ = ui.update(Message::PhotosLoaded(Err("b".into())));
    let _ = ui.update(Message::ClearErrors);
    assert_eq!(ui.error_count(), 0);
}

#[test]
#[serial]
fn test_search_query_accessor() {
    let (mut ui, _dir) = new_ui();
    let _ = ui.update(Message::SearchChanged("dsc".into()));
    assert_eq!(ui.search_query(), "dsc");
}
