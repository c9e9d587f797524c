use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use crowdfund_core::app::{AppBuilder, CampaignService, CompletionLoop, Schedule};
use crowdfund_core::domain::{ErrorKind, events};
use crowdfund_core::impls::{BrokerConfig, InMemoryCampaignRepository, InMemoryEventBus};
use crowdfund_core::ports::{Clock, FixedClock, SystemClock};
use crowdfund_core::wire::{
    CampaignView, CreateCampaignRequest, DeleteCampaignRequest, DeletionNotice,
    GetCampaignByIdRequest, GetCampaignsByOwnerRequest, UpdateCampaignRequest, WireCategory,
    WireStatus,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0).unwrap()
}

struct World {
    service: Arc<CampaignService>,
    bus: Arc<InMemoryEventBus>,
    clock: FixedClock,
    shared_clock: Arc<dyn Clock>,
}

fn world() -> World {
    let clock = FixedClock::new(t0());
    let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
    let bus = Arc::new(
        InMemoryEventBus::connect(BrokerConfig {
            exchange: "campaign-events".into(),
            capacity: 16,
            ..Default::default()
        })
        .unwrap(),
    );
    let service = AppBuilder::new()
        .repository(Arc::new(InMemoryCampaignRepository::new(Arc::clone(&shared_clock))))
        .publisher(bus.clone())
        .clock(Arc::clone(&shared_clock))
        .build()
        .unwrap();
    World {
        service: Arc::new(service),
        bus,
        clock,
        shared_clock,
    }
}

fn request(owner_id: u64, title: &str, deadline_in: Duration) -> CreateCampaignRequest {
    CreateCampaignRequest {
        owner_id,
        title: title.to_string(),
        description: String::new(),
        target_amount: 1_000,
        deadline: Some(t0() + deadline_in),
        category: WireCategory::Health as i32,
        min_donation: 10,
    }
}

#[tokio::test]
async fn create_update_delete_round_trip_with_events() {
    let w = world();
    let mut rx = w.bus.subscribe();

    let created = w
        .service
        .create_campaign(request(7, "Clinic generator", Duration::days(3)))
        .await
        .unwrap()
        .campaign;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.exchange, "campaign-events");
    assert_eq!(first.routing_key, events::ROUTING_KEY_CREATED);
    let announced: CampaignView = serde_json::from_slice(&first.payload).unwrap();
    assert_eq!(announced.id, created.id);

    w.service
        .update_campaign_by_id(UpdateCampaignRequest {
            id: created.id.clone(),
            owner_id: 7,
            description: "Backup power for the rural clinic".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rx.recv().await.unwrap().routing_key, events::ROUTING_KEY_UPDATED);

    let ack = w
        .service
        .delete_campaign_by_id(DeleteCampaignRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap();
    assert_eq!(ack.owner_id, 7);

    let deleted = rx.recv().await.unwrap();
    assert_eq!(deleted.routing_key, events::ROUTING_KEY_DELETED);
    let notice: DeletionNotice = serde_json::from_slice(&deleted.payload).unwrap();
    assert_eq!(notice.owner_id, 7);
    assert_eq!(notice.id, created.id);

    let err = w
        .service
        .get_campaign_by_id(GetCampaignByIdRequest { id: created.id })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn expired_campaigns_complete_on_schedule_and_stay_closed() {
    let w = world();
    let short = w
        .service
        .create_campaign(request(3, "Weekend bake sale", Duration::hours(1)))
        .await
        .unwrap()
        .campaign;
    let long = w
        .service
        .create_campaign(request(3, "Annual scholarship", Duration::days(90)))
        .await
        .unwrap()
        .campaign;
    w.service.flush_events().await;
    let events_before = w.bus.published().await.len();

    w.clock.advance(Duration::hours(2));
    let handle = CompletionLoop::spawn(
        Arc::clone(&w.service),
        Arc::clone(&w.shared_clock),
        Schedule::Every(StdDuration::from_millis(10)),
    );
    tokio::time::sleep(StdDuration::from_millis(100)).await;
    handle.shutdown_and_join().await;

    let mine = w
        .service
        .get_campaigns_by_owner(GetCampaignsByOwnerRequest { owner_id: 3 })
        .await
        .unwrap()
        .campaigns;
    let status_of = |id: &str| mine.iter().find(|c| c.id == id).map(|c| c.status);
    assert_eq!(status_of(&short.id), Some(WireStatus::Completed as i32));
    assert_eq!(status_of(&long.id), Some(WireStatus::Active as i32));

    // completion emits nothing
    w.service.flush_events().await;
    assert_eq!(w.bus.published().await.len(), events_before);

    let reopen = w
        .service
        .update_campaign_by_id(UpdateCampaignRequest {
            id: short.id,
            owner_id: 3,
            status: WireStatus::Active as i32,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(reopen.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn closed_broker_does_not_block_mutations() {
    let w = world();
    w.bus.close();

    let created = w
        .service
        .create_campaign(request(9, "Animal shelter roof", Duration::days(5)))
        .await
        .unwrap()
        .campaign;

    let fetched = w
        .service
        .get_campaign_by_id(GetCampaignByIdRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .campaign;
    assert_eq!(fetched, created);
    w.service.flush_events().await;
    assert!(w.bus.published().await.is_empty());
}

#[tokio::test]
async fn concurrent_creates_all_land() {
    let w = world();
    let mut joins = Vec::new();
    for n in 0..16u64 {
        let service = Arc::clone(&w.service);
        joins.push(tokio::spawn(async move {
            service
                .create_campaign(request(1, &format!("Parallel drive {n}"), Duration::days(1)))
                .await
        }));
    }
    for join in joins {
        join.await.unwrap().unwrap();
    }

    let all = w
        .service
        .get_campaigns_by_owner(GetCampaignsByOwnerRequest { owner_id: 1 })
        .await
        .unwrap()
        .campaigns;
    assert_eq!(all.len(), 16);
    w.service.flush_events().await;
    assert_eq!(w.bus.published_with_key(events::ROUTING_KEY_CREATED).await.len(), 16);
}

#[tokio::test]
async fn campaign_expires_in_real_time() {
    let bus = Arc::new(InMemoryEventBus::connect(BrokerConfig::default()).unwrap());
    let service = AppBuilder::new()
        .repository(Arc::new(InMemoryCampaignRepository::new(Arc::new(SystemClock))))
        .publisher(bus)
        .build()
        .unwrap();

    let created = service
        .create_campaign(CreateCampaignRequest {
            deadline: Some(Utc::now() + Duration::seconds(1)),
            ..request(11, "One second fundraiser", Duration::zero())
        })
        .await
        .unwrap()
        .campaign;

    tokio::time::sleep(StdDuration::from_millis(1_200)).await;
    let report = service.complete_expired().await;

    assert!(report.is_ok());
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].id.to_string(), created.id);
    assert!(service.complete_expired().await.completed.is_empty());
}
