//! Cross-core barrier arrival tracking.

use coresim::sync::SyncBarrier;

#[test]
fn releases_only_once_every_core_has_arrived() {
    let mut barrier = SyncBarrier::new(3);
    assert!(!barrier.arrive(10, 0));
    assert!(!barrier.arrive(10, 1));
    assert!(barrier.arrive(10, 2));
}

#[test]
fn release_queues_the_program_index_for_drain_ready() {
    let mut barrier = SyncBarrier::new(2);
    assert!(!barrier.arrive(5, 0));
    assert!(barrier.drain_ready().is_empty());
    assert!(barrier.arrive(5, 1));
    assert_eq!(barrier.drain_ready(), vec![5]);
    // drain_ready empties the queue
    assert!(barrier.drain_ready().is_empty());
}

#[test]
fn different_program_indices_track_independently() {
    let mut barrier = SyncBarrier::new(2);
    assert!(!barrier.arrive(0, 0));
    assert!(barrier.arrive(1, 0));
    assert!(barrier.arrive(1, 1));
    assert!(!barrier.is_released(0));
    assert!(barrier.is_released(1));
}

#[test]
fn is_released_does_not_record_a_new_arrival() {
    let mut barrier = SyncBarrier::new(2);
    assert!(!barrier.arrive(7, 0));
    assert!(!barrier.is_released(7));
    assert!(!barrier.is_released(7));
    assert!(barrier.arrive(7, 1));
    assert!(barrier.is_released(7));
}
