//! Stress tests for the reader/writer lock under real threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use draftcore::sync::Shared;
use draftcore::{EditSession, SharedAccessLock};

const WRITERS: usize = 4;
const READERS: usize = 4;
const ROUNDS: usize = 2_000;

#[test]
fn writers_never_overlap_readers_or_each_other() {
    let lock = Arc::new(SharedAccessLock::new());
    let inside_writers = Arc::new(AtomicUsize::new(0));
    let inside_readers = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..WRITERS {
        let (lock, w, r) = (
            Arc::clone(&lock),
            Arc::clone(&inside_writers),
            Arc::clone(&inside_readers),
        );
        handles.push(thread::spawn(move || {
            for _ in 0..ROUNDS {
                let _guard = lock.write_guard();
                assert_eq!(w.fetch_add(1, Ordering::SeqCst), 0, "two writers inside");
                assert_eq!(r.load(Ordering::SeqCst), 0, "reader inside with writer");
                w.fetch_sub(1, Ordering::SeqCst);
            }
        }));
    }
    for _ in 0..READERS {
        let (lock, w, r) = (
            Arc::clone(&lock),
            Arc::clone(&inside_writers),
            Arc::clone(&inside_readers),
        );
        handles.push(thread::spawn(move || {
            for _ in 0..ROUNDS {
                let _guard = lock.read_guard();
                r.fetch_add(1, Ordering::SeqCst);
                assert_eq!(w.load(Ordering::SeqCst), 0, "writer inside with reader");
                r.fetch_sub(1, Ordering::SeqCst);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert!(!lock.is_read_held());
    assert!(!lock.is_write_held());
}

#[test]
fn shared_value_sees_no_torn_writes() {
    // Writers keep both halves equal; a reader observing them differ saw a
    // write in progress.
    let shared = Arc::new(Shared::new((0u64, 0u64)));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for i in 1..=ROUNDS as u64 {
                let mut pair = shared.write();
                pair.0 = i;
                thread::yield_now();
                pair.1 = i;
            }
        })
    };
    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let (shared, done) = (Arc::clone(&shared), Arc::clone(&done));
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let pair = shared.read();
                    assert_eq!(pair.0, pair.1, "torn read");
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().expect("reader panicked");
    }
    assert_eq!(*shared.read(), (ROUNDS as u64, ROUNDS as u64));
}

#[test]
fn render_thread_reads_while_edit_thread_types() {
    let session = Arc::new(EditSession::with_text(""));
    let done = Arc::new(AtomicBool::new(false));

    let render = {
        let (session, done) = (Arc::clone(&session), Arc::clone(&done));
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let (blocks, text) = session.read(|doc| (doc.block_count(), doc.text()));
                assert_eq!(blocks, text.matches('\n').count() + 1);
            }
        })
    };

    for i in 0..500 {
        let end = session.read(|doc| doc.end());
        let piece = if i % 50 == 49 { "\n" } else { "字" };
        session.insert(end, piece).expect("append at end");
    }
    done.store(true, Ordering::Release);
    render.join().expect("render thread panicked");

    assert_eq!(session.read(|doc| doc.block_count()), 11);
    assert_eq!(session.word_count(), 490);
}
