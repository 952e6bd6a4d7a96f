//! Record layouts, vertex layouts, and dispatch planning for the **Tiamat**
//! particle engine.
//!
//! This crate is intentionally dependency-free so the shape checks that
//! decide whether a deployment config is buildable can be unit-tested (and
//! reused by tooling) without pulling in any GPU or windowing code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`dispatch`] | `DispatchPlan`, `DEFAULT_WORKGROUP_SIZE` |
//! | [`error`] | `LayoutError`, `RecordError` |
//! | [`format`] | `VertexFormat`, `PrimitiveTopology` |
//! | [`layout`] | `VertexLayout`, `VertexAttribute`, `StepMode`, `validate_layout_set` |
//! | [`record`] | `RecordLayout` |
//! | [`slot`] | `Slot`, `SlotPair`, `for_tick` |
//!
//! # Quick start
//!
//! ```rust
//! use tiamat_schema::{DispatchPlan, RecordLayout, slot};
//!
//! // 10_000 particles of 8 floats each.
//! let record = RecordLayout::from_seed(10_000, 80_000).unwrap();
//! assert_eq!(record.stride_bytes(), 32);
//! assert_eq!(record.buffer_bytes(), 320_000);
//!
//! let plan = DispatchPlan::for_particles(record.particle_count(), 64);
//! assert_eq!(plan.workgroups, 157);
//!
//! // Even ticks read slot A and write slot B.
//! assert_eq!(slot::for_tick(0).write, slot::for_tick(1).read);
//! ```

pub mod dispatch;
pub mod error;
pub mod format;
pub mod layout;
pub mod record;
pub mod slot;

pub use dispatch::{DEFAULT_WORKGROUP_SIZE, DispatchPlan};
pub use error::{LayoutError, RecordError};
pub use format::{PrimitiveTopology, VertexFormat};
pub use layout::{StepMode, VertexAttribute, VertexLayout, validate_layout_set};
pub use record::RecordLayout;
pub use slot::{Slot, SlotPair};

#[cfg(test)]
mod plan_tests {
    use super::*;

    fn attr(loc: u32, offset: u64, format: VertexFormat) -> VertexAttribute {
        VertexAttribute { shader_location: loc, offset, format }
    }

    fn record_view() -> VertexLayout {
        // Matches an 8-float particle record: position.xyz + age + velocity.xyz.
        VertexLayout {
            stride: 32,
            step_mode: StepMode::Instance,
            attributes: vec![
                attr(0, 0, VertexFormat::Float32x3),
                attr(1, 16, VertexFormat::Float32x3),
            ],
        }
    }

    fn corner_view() -> VertexLayout {
        VertexLayout {
            stride: 8,
            step_mode: StepMode::Vertex,
            attributes: vec![attr(2, 0, VertexFormat::Float32x2)],
        }
    }

    #[test] fn record_view_is_valid() { record_view().validate().unwrap(); }
    #[test] fn full_set_is_valid() { validate_layout_set(&[record_view(), corner_view()]).unwrap(); }
    #[test] fn instance_only_set_is_valid() { validate_layout_set(&[record_view()]).unwrap(); }

    #[test]
    fn zero_stride_rejected() {
        let mut l = record_view();
        l.stride = 0;
        l.validate().unwrap_err();
    }

    #[test]
    fn unaligned_stride_rejected() {
        let mut l = record_view();
        l.stride = 30;
        l.validate().unwrap_err();
    }

    #[test]
    fn attribute_past_stride_rejected() {
        // A Float32x4 at offset 20 ends at byte 36 of a 32-byte record.
        let mut l = record_view();
        l.attributes.push(attr(5, 20, VertexFormat::Float32x4));
        l.validate().unwrap_err();
    }

    #[test]
    fn unaligned_offset_rejected() {
        let mut l = record_view();
        l.attributes[1].offset = 14;
        l.validate().unwrap_err();
    }

    #[test]
    fn empty_attribute_list_rejected() {
        let mut l = record_view();
        l.attributes.clear();
        l.validate().unwrap_err();
    }

    #[test]
    fn duplicate_location_in_one_layout_rejected() {
        let mut l = record_view();
        l.attributes[1].shader_location = 0;
        l.validate().unwrap_err();
    }

    #[test]
    fn duplicate_location_across_layouts_rejected() {
        let mut c = corner_view();
        c.attributes[0].shader_location = 1;
        validate_layout_set(&[record_view(), c]).unwrap_err();
    }

    #[test]
    fn missing_instance_layout_rejected() {
        validate_layout_set(&[corner_view()]).unwrap_err();
    }

    #[test]
    fn two_instance_layouts_rejected() {
        let mut second = record_view();
        second.attributes = vec![attr(7, 0, VertexFormat::Float32)];
        validate_layout_set(&[record_view(), second]).unwrap_err();
    }

    #[test]
    fn two_vertex_layouts_rejected() {
        let mut second = corner_view();
        second.attributes = vec![attr(7, 0, VertexFormat::Float32)];
        validate_layout_set(&[record_view(), corner_view(), second]).unwrap_err();
    }

    #[test]
    fn format_widths() {
        assert_eq!(VertexFormat::Float32.size(), 4);
        assert_eq!(VertexFormat::Float32x2.size(), 8);
        assert_eq!(VertexFormat::Float32x3.size(), 12);
        assert_eq!(VertexFormat::Float32x4.size(), 16);
        assert_eq!(VertexFormat::Uint32.size(), 4);
        assert_eq!(VertexFormat::Sint32.size(), 4);
    }

    #[test]
    fn four_million_particles_need_62_500_workgroups() {
        let plan = DispatchPlan::for_particles(4_000_000, 64);
        assert_eq!(plan.workgroups, 62_500);
        assert_eq!(plan.thread_count(), 4_000_000);
    }

    #[test]
    fn partial_workgroup_rounds_up() {
        let plan = DispatchPlan::for_particles(100, 64);
        assert_eq!(plan.workgroups, 2);
        assert_eq!(plan.thread_count(), 128);
    }

    #[test]
    fn exact_multiple_does_not_round() {
        assert_eq!(DispatchPlan::for_particles(128, 64).workgroups, 2);
        assert_eq!(DispatchPlan::for_particles(64, 64).workgroups, 1);
        assert_eq!(DispatchPlan::for_particles(1, 64).workgroups, 1);
    }

    #[test]
    fn record_from_seed() {
        let r = RecordLayout::from_seed(1_000, 8_000).unwrap();
        assert_eq!(r.particle_count(), 1_000);
        assert_eq!(r.stride_floats(), 8);
        assert_eq!(r.stride_bytes(), 32);
        assert_eq!(r.buffer_bytes(), 32_000);
    }

    #[test]
    fn four_million_by_eight_floats_is_128_million_bytes() {
        let r = RecordLayout::from_seed(4_000_000, 32_000_000).unwrap();
        assert_eq!(r.buffer_bytes(), 128_000_000);
    }

    #[test] fn zero_particles_rejected() { RecordLayout::from_seed(0, 8).unwrap_err(); }
    #[test] fn empty_seed_rejected() { RecordLayout::from_seed(8, 0).unwrap_err(); }
    #[test] fn uneven_seed_rejected() { RecordLayout::from_seed(3, 8).unwrap_err(); }

    #[test]
    fn slot_parity() {
        assert_eq!(slot::for_tick(0), SlotPair { read: Slot::A, write: Slot::B });
        assert_eq!(slot::for_tick(1), SlotPair { read: Slot::B, write: Slot::A });
    }

    #[test]
    fn slots_never_alias() {
        for tick in 0..64u64 {
            let pair = slot::for_tick(tick);
            assert_ne!(pair.read, pair.write, "tick {tick}");
        }
    }

    #[test]
    fn write_of_one_tick_is_read_of_next() {
        for tick in 0..64u64 {
            assert_eq!(slot::for_tick(tick).write, slot::for_tick(tick + 1).read);
        }
    }

    #[test]
    fn assignment_repeats_every_two_ticks() {
        for tick in 0..64u64 {
            assert_eq!(slot::for_tick(tick), slot::for_tick(tick + 2));
        }
    }
}
