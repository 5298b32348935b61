//! The encoder only touches the buffers it is handed. A counting allocator
//! checks that no generation path reaches the heap.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use qrtiny::qrcode::{BUFFER_LEN, SCRATCH_BUFFER_LEN};
use qrtiny::{Mask, QrCode, QrCodeEcc, QrSegmentMode};

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn allocations_during(f: impl FnOnce()) -> usize {
    let before = ALLOCATIONS.with(Cell::get);
    f();
    ALLOCATIONS.with(Cell::get) - before
}

#[test]
fn encoding_does_not_allocate() {
    let cases = [
        ("0123456789", QrSegmentMode::Numeric),
        ("HELLO WORLD", QrSegmentMode::Alphanumeric),
        ("hello world", QrSegmentMode::Alphanumeric),
        ("hello, world", QrSegmentMode::Byte),
    ];
    for (text, mode) in cases {
        for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium] {
            let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
            let mut outbuffer = [0u8; BUFFER_LEN];
            let mut dark = false;
            let count = allocations_during(|| {
                let result = QrCode::encode_text(
                    text,
                    mode,
                    &mut tempbuffer,
                    &mut outbuffer,
                    ecl,
                    Mask::Pattern3,
                );
                dark = matches!(result, Ok(qr) if qr.get_module(0, 0));
            });
            assert!(dark, "{text:?} {ecl:?} did not encode");
            assert_eq!(count, 0, "{text:?} {mode:?} {ecl:?} allocated");
        }
    }
}

#[test]
fn rejected_input_does_not_allocate() {
    let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
    let mut outbuffer = [0u8; BUFFER_LEN];
    let mut failed = false;
    let count = allocations_during(|| {
        failed = QrCode::encode_text(
            "HELLO#",
            QrSegmentMode::Alphanumeric,
            &mut tempbuffer,
            &mut outbuffer,
            QrCodeEcc::Low,
            Mask::Pattern0,
        )
        .is_err();
    });
    assert!(failed);
    assert_eq!(count, 0);
}
