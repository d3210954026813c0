//! Tests for the meeting store: registration, invitations, and accepted-meeting
//! queries.

use chrono::{DateTime, Duration, TimeZone, Utc};
use meeting_engine::{MeetingId, MeetingStore, NewMeeting, ScheduleError, UserId};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Store with users `alice` (0), `bob` (1) and `carol` (2).
fn store_with_three_users() -> (MeetingStore, UserId, UserId, UserId) {
    let mut store = MeetingStore::new();
    let alice = store.add_user("alice", None).unwrap().id;
    let bob = store.add_user("bob", Some("backend".to_string())).unwrap().id;
    let carol = store.add_user("carol", None).unwrap().id;
    (store, alice, bob, carol)
}

fn half_hour(start: DateTime<Utc>, creator: UserId) -> NewMeeting {
    NewMeeting::new(start, start + Duration::minutes(30), creator)
}

fn sorted_ids(meetings: &[&meeting_engine::Meeting]) -> Vec<MeetingId> {
    let mut ids: Vec<MeetingId> = meetings.iter().map(|m| m.id).collect();
    ids.sort();
    ids
}

// ── Users ───────────────────────────────────────────────────────────────────

#[test]
fn users_get_increasing_ids() {
    let (store, alice, bob, carol) = store_with_three_users();

    assert_eq!((alice, bob, carol), (UserId(0), UserId(1), UserId(2)));
    assert_eq!(store.user_count(), 3);
    assert_eq!(store.get_user(bob).unwrap().info.as_deref(), Some("backend"));
    assert_eq!(store.find_user("carol").unwrap().id, carol);
    assert!(store.find_user("dave").is_none());
}

#[test]
fn duplicate_username_is_rejected() {
    let (mut store, ..) = store_with_three_users();

    let err = store.add_user("bob", None).unwrap_err();

    assert_eq!(err, ScheduleError::DuplicateUsername("bob".to_string()));
    assert_eq!(store.user_count(), 3);
    // The failed call must not burn an id.
    assert_eq!(store.add_user("dave", None).unwrap().id, UserId(3));
}

#[test]
fn blank_username_is_rejected() {
    let mut store = MeetingStore::new();
    assert_eq!(
        store.add_user("   ", None).unwrap_err(),
        ScheduleError::InvalidUsername
    );
    assert_eq!(store.user_count(), 0);
}

#[test]
fn unknown_user_lookup_fails() {
    let store = MeetingStore::new();
    assert_eq!(
        store.get_user(UserId(5)).unwrap_err(),
        ScheduleError::UnknownUser(UserId(5))
    );
}

// ── Creating meetings ───────────────────────────────────────────────────────

#[test]
fn creator_is_sole_participant_and_never_invited() {
    let (mut store, alice, bob, carol) = store_with_three_users();

    let meeting = store
        .add_meeting(half_hour(t0(), alice).invite([alice, bob, carol]))
        .unwrap()
        .clone();

    assert_eq!(meeting.id, MeetingId(0));
    assert_eq!(meeting.participants.iter().copied().collect::<Vec<_>>(), vec![alice]);
    assert_eq!(meeting.invited.iter().copied().collect::<Vec<_>>(), vec![bob, carol]);
    assert!(store.get_suggested_meetings(alice).unwrap().is_empty());
}

#[test]
fn meeting_ids_increase() {
    let (mut store, alice, ..) = store_with_three_users();

    let first = store.add_meeting(half_hour(t0(), alice)).unwrap().id;
    let second = store
        .add_meeting(half_hour(t0() + Duration::hours(1), alice))
        .unwrap()
        .id;

    assert_eq!(first, MeetingId(0));
    assert_eq!(second, MeetingId(1));
}

#[test]
fn invitees_see_meeting_as_suggested() {
    let (mut store, alice, bob, carol) = store_with_three_users();
    let id = store
        .add_meeting(half_hour(t0(), alice).invite([bob, carol]))
        .unwrap()
        .id;

    for user in [bob, carol] {
        let suggested = store.get_suggested_meetings(user).unwrap();
        assert_eq!(sorted_ids(&suggested), vec![id]);
    }
}

#[test]
fn unknown_creator_or_invitee_is_rejected_without_side_effects() {
    let (mut store, alice, bob, _) = store_with_three_users();

    let err = store
        .add_meeting(half_hour(t0(), UserId(42)).invite([alice]))
        .unwrap_err();
    assert_eq!(err, ScheduleError::UnknownUser(UserId(42)));

    let err = store
        .add_meeting(half_hour(t0(), alice).invite([bob, UserId(7)]))
        .unwrap_err();
    assert_eq!(err, ScheduleError::UnknownUser(UserId(7)));

    assert_eq!(store.meeting_count(), 0);
    assert!(store.get_suggested_meetings(bob).unwrap().is_empty());
    assert_eq!(store.add_meeting(half_hour(t0(), alice)).unwrap().id, MeetingId(0));
}

#[test]
fn start_not_before_end_is_invalid_interval() {
    let (mut store, alice, bob, _) = store_with_three_users();
    let t = t0();

    let err = store
        .add_meeting(NewMeeting::new(t, t, alice).invite([bob]))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval { .. }));

    let err = store
        .add_meeting(NewMeeting::new(t + Duration::hours(1), t, alice))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidInterval { .. }));

    assert_eq!(store.meeting_count(), 0);
    assert!(store.get_suggested_meetings(bob).unwrap().is_empty());
}

#[test]
fn period_must_exceed_duration() {
    let (mut store, alice, ..) = store_with_three_users();

    let err = store
        .add_meeting(half_hour(t0(), alice).every(Duration::minutes(30)))
        .unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InvalidPeriod {
            period_seconds: 1800,
            duration_seconds: 1800,
        }
    );

    let err = store
        .add_meeting(half_hour(t0(), alice).every(Duration::zero()))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidPeriod { .. }));

    assert_eq!(store.meeting_count(), 0);

    let ok = store
        .add_meeting(half_hour(t0(), alice).every(Duration::minutes(31)))
        .unwrap();
    assert!(ok.is_regular());
}

// ── Accept / decline ────────────────────────────────────────────────────────

#[test]
fn accept_moves_user_to_participants() {
    let (mut store, alice, bob, carol) = store_with_three_users();
    let id = store
        .add_meeting(half_hour(t0(), alice).invite([bob, carol]))
        .unwrap()
        .id;

    let meeting = store.accept_meeting(bob, id).unwrap().clone();

    assert!(meeting.participants.contains(&alice));
    assert!(meeting.participants.contains(&bob));
    assert!(!meeting.invited.contains(&bob));
    assert!(meeting.invited.contains(&carol));
    assert!(store.get_suggested_meetings(bob).unwrap().is_empty());

    let accepted = store
        .get_accepted_meetings(bob, t0(), t0() + Duration::hours(1))
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, id);
}

#[test]
fn decline_removes_invitation_only() {
    let (mut store, alice, bob, carol) = store_with_three_users();
    let id = store
        .add_meeting(half_hour(t0(), alice).invite([bob, carol]))
        .unwrap()
        .id;
    store.accept_meeting(bob, id).unwrap();

    let meeting = store.decline_meeting(carol, id).unwrap().clone();

    assert!(meeting.invited.is_empty());
    assert_eq!(meeting.participants.len(), 2);
    assert!(store.get_suggested_meetings(carol).unwrap().is_empty());
    assert!(store
        .get_accepted_meetings(carol, t0(), t0() + Duration::hours(1))
        .unwrap()
        .is_empty());
}

#[test]
fn answering_twice_is_not_invited() {
    let (mut store, alice, bob, carol) = store_with_three_users();
    let id = store
        .add_meeting(half_hour(t0(), alice).invite([bob, carol]))
        .unwrap()
        .id;
    store.accept_meeting(bob, id).unwrap();
    store.decline_meeting(carol, id).unwrap();

    let not_invited = |user| ScheduleError::NotInvited { user, meeting: id };
    assert_eq!(store.accept_meeting(bob, id).unwrap_err(), not_invited(bob));
    assert_eq!(store.decline_meeting(bob, id).unwrap_err(), not_invited(bob));
    assert_eq!(store.accept_meeting(carol, id).unwrap_err(), not_invited(carol));
    assert_eq!(store.accept_meeting(alice, id).unwrap_err(), not_invited(alice));
}

#[test]
fn accept_checks_user_then_meeting() {
    let (mut store, alice, bob, _) = store_with_three_users();
    let id = store
        .add_meeting(half_hour(t0(), alice).invite([bob]))
        .unwrap()
        .id;
    let before = store.get_meeting(id).unwrap().clone();

    assert_eq!(
        store.accept_meeting(UserId(9), MeetingId(9)).unwrap_err(),
        ScheduleError::UnknownUser(UserId(9))
    );
    assert_eq!(
        store.accept_meeting(bob, MeetingId(9)).unwrap_err(),
        ScheduleError::UnknownMeeting(MeetingId(9))
    );
    assert_eq!(
        store.decline_meeting(bob, MeetingId(9)).unwrap_err(),
        ScheduleError::UnknownMeeting(MeetingId(9))
    );
    assert_eq!(store.get_meeting(id).unwrap(), &before);
}

// ── Queries ─────────────────────────────────────────────────────────────────

#[test]
fn get_meeting_unknown_id() {
    let store = MeetingStore::new();
    assert_eq!(
        store.get_meeting(MeetingId(0)).unwrap_err(),
        ScheduleError::UnknownMeeting(MeetingId(0))
    );
}

#[test]
fn suggested_and_accepted_require_known_user() {
    let store = MeetingStore::new();
    assert_eq!(
        store.get_suggested_meetings(UserId(1)).unwrap_err(),
        ScheduleError::UnknownUser(UserId(1))
    );
    assert_eq!(
        store
            .get_accepted_meetings(UserId(1), t0(), t0() + Duration::hours(1))
            .unwrap_err(),
        ScheduleError::UnknownUser(UserId(1))
    );
}

#[test]
fn single_meeting_window_boundaries() {
    let (mut store, alice, ..) = store_with_three_users();
    let t = t0();
    store.add_meeting(half_hour(t, alice)).unwrap();

    let exact = store
        .get_accepted_meetings(alice, t, t + Duration::minutes(30))
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].start, t);
    assert_eq!(exact[0].end, t + Duration::minutes(30));

    let later = store
        .get_accepted_meetings(alice, t + Duration::minutes(31), t + Duration::minutes(60))
        .unwrap();
    assert!(later.is_empty());
}

#[test]
fn accepted_lists_singles_before_occurrences() {
    let (mut store, alice, bob, _) = store_with_three_users();
    let t = t0();
    let weekly = store
        .add_meeting(half_hour(t, bob).invite([alice]).every(Duration::hours(2)))
        .unwrap()
        .id;
    store.accept_meeting(alice, weekly).unwrap();
    let single = store
        .add_meeting(half_hour(t + Duration::hours(3), alice))
        .unwrap()
        .id;

    let accepted = store
        .get_accepted_meetings(alice, t, t + Duration::minutes(190))
        .unwrap();

    assert_eq!(accepted.len(), 3);
    assert_eq!(accepted[0].id, single);
    assert_eq!(accepted[1].id, weekly);
    assert_eq!(accepted[2].id, weekly);
    let mut starts: Vec<_> = accepted[1..].iter().map(|m| m.start).collect();
    starts.sort();
    assert_eq!(starts, vec![t, t + Duration::hours(2)]);
}

#[test]
fn expanded_occurrences_do_not_alias_the_template() {
    let (mut store, alice, ..) = store_with_three_users();
    let t = t0();
    let id = store
        .add_meeting(half_hour(t, alice).every(Duration::hours(1)))
        .unwrap()
        .id;

    let mut accepted = store
        .get_accepted_meetings(alice, t + Duration::hours(4), t + Duration::hours(5))
        .unwrap();
    accepted[0].participants.clear();

    let stored = store.get_meeting(id).unwrap();
    assert_eq!(stored.start, t);
    assert_eq!(stored.participants.len(), 1);
}
