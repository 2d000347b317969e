use async_trait::async_trait;
use mapnote::{
    constants::{GEOLOCATION_FAILED_MESSAGE, REGION_NOT_FOUND, SAVED_ICON_URL, USER_MARKER_LABEL},
    ControllerBuilder, FixedPosition, GeocodeFailure, GeocodeResult, GeolocationError, HeadlessMap,
    LatLng, MapInteractionController, MarkerKind, NoGeolocation, Point, PopupState,
    ReverseGeocoder, SavedLocation, Viewport,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Answers every lookup with the same result
struct StaticGeocoder(GeocodeResult);

#[async_trait]
impl ReverseGeocoder for StaticGeocoder {
    async fn reverse_geocode(&self, _coord: LatLng) -> GeocodeResult {
        self.0.clone()
    }
}

fn answering(display_name: &str) -> Arc<dyn ReverseGeocoder> {
    Arc::new(StaticGeocoder(GeocodeResult::resolved(display_name)))
}

type PendingLookup = (LatLng, Option<oneshot::Sender<GeocodeResult>>);

/// Parks every lookup until the test answers it, so completion order is
/// under the test's control
#[derive(Clone, Default)]
struct ScriptedGeocoder {
    requests: Arc<Mutex<Vec<PendingLookup>>>,
}

impl ScriptedGeocoder {
    async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.requests.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} geocoding requests");
    }

    fn answer(&self, index: usize, result: GeocodeResult) {
        let sender = self.requests.lock().unwrap()[index].1.take().unwrap();
        sender.send(result).unwrap();
    }
}

#[async_trait]
impl ReverseGeocoder for ScriptedGeocoder {
    async fn reverse_geocode(&self, coord: LatLng) -> GeocodeResult {
        let (tx, rx) = oneshot::channel();
        self.requests.lock().unwrap().push((coord, Some(tx)));
        rx.await
            .unwrap_or(GeocodeResult::Failed(GeocodeFailure::Network("dropped".into())))
    }
}

fn garut() -> LatLng {
    LatLng::from_lon_lat(107.90, -7.22)
}

fn headless_map() -> HeadlessMap {
    HeadlessMap::new(Viewport::new(garut(), 14.0, Point::new(800.0, 600.0)))
}

fn controller(map: &HeadlessMap, geocoder: Arc<dyn ReverseGeocoder>) -> MapInteractionController {
    mapnote::init_logging();
    ControllerBuilder::new()
        .with_map(map.clone())
        .with_geocoder(geocoder)
        .build()
        .unwrap()
}

async fn settle_next(controller: &mut MapInteractionController) {
    let dispatched = tokio::time::timeout(Duration::from_secs(2), controller.process_next())
        .await
        .expect("controller event queue stalled");
    assert!(dispatched);
}

#[tokio::test]
async fn click_then_save_creates_marker_and_location() {
    let map = headless_map();
    let mut controller = controller(&map, answering("Bandung"));
    let snapshots = Arc::new(Mutex::new(Vec::<Vec<SavedLocation>>::new()));
    let sink = snapshots.clone();
    controller.subscribe_locations(move |locations| sink.lock().unwrap().push(locations.to_vec()));

    controller.on_map_click(map.click_at(garut()));
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup(),
        &PopupState::InputPrompt {
            pending: garut(),
            info: "You clicked on: Bandung".to_string(),
        }
    );

    controller.on_save_confirmed("Home").unwrap();

    let markers = controller.markers().all();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].kind(), MarkerKind::Saved);
    assert_eq!(markers[0].position(), garut());
    assert_eq!(markers[0].description(), "Home");
    assert_eq!(
        controller.locations().all(),
        &[SavedLocation {
            position: garut(),
            description: "Home".to_string(),
        }]
    );
    assert_eq!(controller.popup(), &PopupState::Closed);
    assert_eq!(controller.pending_coordinate(), None);

    let rendered = map.rendered_markers();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].icon_url, SAVED_ICON_URL);
    assert_eq!(snapshots.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_lookup_prompts_with_formatted_coordinate() {
    let map = headless_map();
    let failure = GeocodeResult::Failed(GeocodeFailure::Network("operation timed out".into()));
    let mut controller = controller(&map, Arc::new(StaticGeocoder(failure)));

    controller.on_map_click(map.click_at(garut()));
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup().lines(),
        vec!["Longitude: 107.900000, Latitude: -7.220000".to_string()]
    );
    // the prompt still accepts input
    assert!(controller.on_save_confirmed("Kebun").is_ok());
    assert_eq!(controller.locations().len(), 1);
}

#[tokio::test]
async fn saves_are_listed_in_creation_order() {
    let map = headless_map();
    let mut controller = controller(&map, answering("x"));
    let places = [
        (LatLng::from_lon_lat(107.90, -7.22), "Home"),
        (LatLng::from_lon_lat(107.61, -6.91), "Office"),
        (LatLng::from_lon_lat(107.95, -7.25), "Home"),
    ];

    for (position, description) in places {
        controller.on_map_click(map.click_at(position));
        settle_next(&mut controller).await;
        controller.on_save_confirmed(description).unwrap();
    }

    let saved: Vec<_> = controller
        .locations()
        .all()
        .iter()
        .map(|l| l.description.as_str())
        .collect();
    assert_eq!(saved, vec!["Home", "Office", "Home"]);
    assert_eq!(controller.markers().len(), 3);
    assert!(controller.locations().display_lines()[2].starts_with("Location 3:"));
}

#[tokio::test]
async fn invalid_saves_leave_stores_untouched() {
    let map = headless_map();
    let mut controller = controller(&map, answering("x"));

    assert!(controller.on_save_confirmed("Home").is_err());

    controller.on_map_click(map.click_at(garut()));
    settle_next(&mut controller).await;
    assert!(controller.on_save_confirmed("").is_err());

    assert_eq!(controller.markers().len(), 0);
    assert_eq!(controller.locations().len(), 0);
    assert!(controller.popup().is_open());
}

#[tokio::test]
async fn newer_click_wins_when_older_lookup_resolves_last() {
    let map = headless_map();
    let geocoder = ScriptedGeocoder::default();
    let mut controller = controller(&map, Arc::new(geocoder.clone()));
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = transitions.clone();
    controller.subscribe_popup(move |state| sink.lock().unwrap().push(state.clone()));

    let first = LatLng::from_lon_lat(107.90, -7.22);
    let second = LatLng::from_lon_lat(107.61, -6.91);
    controller.on_map_click(map.click_at(first));
    controller.on_map_click(map.click_at(second));
    geocoder.wait_for_requests(2).await;

    geocoder.answer(1, GeocodeResult::resolved("Bandung"));
    settle_next(&mut controller).await;
    geocoder.answer(0, GeocodeResult::resolved("Garut"));
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup(),
        &PopupState::InputPrompt {
            pending: second,
            info: "You clicked on: Bandung".to_string(),
        }
    );
    assert_eq!(transitions.lock().unwrap().len(), 1);
    assert_eq!(controller.pending_coordinate(), Some(second));
}

#[tokio::test]
async fn newer_click_wins_when_older_lookup_resolves_first() {
    let map = headless_map();
    let geocoder = ScriptedGeocoder::default();
    let mut controller = controller(&map, Arc::new(geocoder.clone()));
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = transitions.clone();
    controller.subscribe_popup(move |state| sink.lock().unwrap().push(state.clone()));

    controller.on_map_click(map.click_at(LatLng::from_lon_lat(107.90, -7.22)));
    controller.on_map_click(map.click_at(LatLng::from_lon_lat(107.61, -6.91)));
    geocoder.wait_for_requests(2).await;

    geocoder.answer(0, GeocodeResult::resolved("Garut"));
    settle_next(&mut controller).await;
    assert_eq!(controller.popup(), &PopupState::Closed);

    geocoder.answer(1, GeocodeResult::resolved("Bandung"));
    settle_next(&mut controller).await;

    let seen = transitions.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].lines(), vec!["You clicked on: Bandung".to_string()]);
}

#[tokio::test]
async fn save_lands_where_the_open_prompt_points() {
    let map = headless_map();
    let geocoder = ScriptedGeocoder::default();
    let mut controller = controller(&map, Arc::new(geocoder.clone()));

    controller.on_map_click(map.click_at(garut()));
    geocoder.wait_for_requests(1).await;
    geocoder.answer(0, GeocodeResult::resolved("Garut"));
    settle_next(&mut controller).await;

    let elsewhere = LatLng::from_lon_lat(107.61, -6.91);
    controller.on_map_click(map.click_at(elsewhere));
    geocoder.wait_for_requests(2).await;
    controller.on_save_confirmed("Home").unwrap();

    assert_eq!(controller.locations().all()[0].position, garut());
    assert_eq!(controller.markers().all()[0].position(), garut());
    assert_eq!(controller.popup(), &PopupState::Closed);

    // the newer click's lookup no longer opens anything
    geocoder.answer(1, GeocodeResult::resolved("Bandung"));
    settle_next(&mut controller).await;
    assert_eq!(controller.popup(), &PopupState::Closed);
    assert_eq!(controller.pending_coordinate(), None);
}

#[tokio::test]
async fn cancelled_prompt_drops_late_result() {
    let map = headless_map();
    let geocoder = ScriptedGeocoder::default();
    let mut controller = controller(&map, Arc::new(geocoder.clone()));

    controller.on_map_click(map.click_at(garut()));
    geocoder.wait_for_requests(1).await;
    controller.on_save_cancelled();

    geocoder.answer(0, GeocodeResult::resolved("Garut"));
    settle_next(&mut controller).await;

    assert_eq!(controller.popup(), &PopupState::Closed);
    assert_eq!(controller.pending_coordinate(), None);
    assert!(controller.on_save_confirmed("Home").is_err());
}

#[tokio::test]
async fn dismissing_prompt_behaves_like_cancel() {
    let map = headless_map();
    let mut controller = controller(&map, answering("Garut"));

    controller.on_map_click(map.click_at(garut()));
    settle_next(&mut controller).await;
    assert!(controller.popup().is_open());

    controller.on_popup_dismissed();
    assert_eq!(controller.popup(), &PopupState::Closed);
    assert_eq!(controller.pending_coordinate(), None);
}

#[tokio::test]
async fn clicking_a_marker_shows_its_info() {
    let map = headless_map();
    let mut controller = controller(
        &map,
        Arc::new(StaticGeocoder(GeocodeResult::Failed(GeocodeFailure::MissingDisplayName))),
    );

    controller.on_map_click(map.click_at(garut()));
    settle_next(&mut controller).await;
    controller.on_save_confirmed("Home").unwrap();

    // a tap a few pixels off the icon anchor still hits it
    let tap = map.click_at(garut());
    let near = map.click_at_pixel(Point::new(tap.pixel.x + 3.0, tap.pixel.y - 2.0));
    controller.on_map_click(near);
    assert_eq!(controller.pending_coordinate(), None);
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup(),
        &PopupState::MarkerInfo {
            description: "Home".to_string(),
            coordinate: garut(),
            region: REGION_NOT_FOUND.to_string(),
        }
    );
    assert_eq!(controller.markers().len(), 1);
}

#[tokio::test]
async fn denied_geolocation_falls_back_to_default_view() {
    let map = headless_map();
    let mut controller = controller(&map, answering("x"));

    controller.locate(Arc::new(NoGeolocation(GeolocationError::PermissionDenied)));
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup(),
        &PopupState::NearestLocationInfo {
            message: GEOLOCATION_FAILED_MESSAGE.to_string(),
        }
    );
    let viewport = map.viewport();
    assert_eq!(viewport.center, controller.config().view.default_center);
    assert_eq!(viewport.zoom, 12.0);
    assert!(controller.markers().is_empty());
    assert!(map.rendered_markers().is_empty());
}

#[tokio::test]
async fn located_user_gets_marker_and_nearest_place() {
    let map = headless_map();
    let home = LatLng::from_lon_lat(107.61, -6.91);
    let mut controller = controller(&map, answering("Bandung"));

    controller.locate(Arc::new(FixedPosition(home)));
    settle_next(&mut controller).await;

    let markers = controller.markers().all();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].kind(), MarkerKind::User);
    assert_eq!(markers[0].description(), USER_MARKER_LABEL);
    assert_eq!(map.viewport().center, home);
    assert_eq!(map.viewport().zoom, 14.0);
    // the lookup has not settled yet
    assert_eq!(controller.popup(), &PopupState::Closed);

    settle_next(&mut controller).await;
    assert_eq!(
        controller.popup(),
        &PopupState::NearestLocationInfo {
            message: "Bandung".to_string(),
        }
    );
}

#[tokio::test]
async fn located_user_without_place_name_sees_coordinate() {
    let map = headless_map();
    let failure = GeocodeResult::Failed(GeocodeFailure::Status(503));
    let mut controller = controller(&map, Arc::new(StaticGeocoder(failure)));

    controller.locate(Arc::new(FixedPosition(garut())));
    settle_next(&mut controller).await;
    settle_next(&mut controller).await;

    assert_eq!(
        controller.popup(),
        &PopupState::NearestLocationInfo {
            message: "Longitude: 107.900000, Latitude: -7.220000".to_string(),
        }
    );
}

#[tokio::test]
async fn click_during_geolocation_lookup_supersedes_it() {
    let map = headless_map();
    let geocoder = ScriptedGeocoder::default();
    let mut controller = controller(&map, Arc::new(geocoder.clone()));

    controller.locate(Arc::new(FixedPosition(garut())));
    settle_next(&mut controller).await;
    geocoder.wait_for_requests(1).await;

    let elsewhere = LatLng::from_lon_lat(107.61, -6.91);
    controller.on_map_click(map.click_at(elsewhere));
    geocoder.wait_for_requests(2).await;

    geocoder.answer(1, GeocodeResult::resolved("Bandung"));
    settle_next(&mut controller).await;
    geocoder.answer(0, GeocodeResult::resolved("Garut"));
    settle_next(&mut controller).await;

    assert!(matches!(controller.popup(), PopupState::InputPrompt { .. }));
}

#[tokio::test]
async fn run_loop_processes_posted_events() {
    let map = headless_map();
    let (popup_tx, mut popup_rx) = tokio::sync::mpsc::unbounded_channel();
    let (saved_tx, mut saved_rx) = tokio::sync::mpsc::unbounded_channel();
    mapnote::init_logging();
    let mut controller = ControllerBuilder::new()
        .with_map(map.clone())
        .with_geocoder(answering("Bandung"))
        .on_popup(move |state| {
            let _ = popup_tx.send(state.clone());
        })
        .on_locations(move |locations| {
            let _ = saved_tx.send(locations.len());
        })
        .build()
        .unwrap();
    let handle = controller.handle();

    let runner = tokio::spawn(async move {
        controller.run().await;
        controller
    });

    assert!(handle.click(map.click_at(garut())));
    let prompt = tokio::time::timeout(Duration::from_secs(2), popup_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(prompt.lines(), vec!["You clicked on: Bandung".to_string()]);

    assert!(handle.save("Home"));
    let count = tokio::time::timeout(Duration::from_secs(2), saved_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(count, 1);

    assert!(handle.shutdown());
    let controller = tokio::time::timeout(Duration::from_secs(2), runner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(controller.markers().len(), 1);
    assert_eq!(controller.popup(), &PopupState::Closed);
}
