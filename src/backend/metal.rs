//! Metal compute backend: one GPU thread per candidate offset.
//!
//! The kernel source is embedded as a literal MSL string and compiled at
//! runtime via `newLibraryWithSource` (no include paths needed). Device,
//! library, and pipeline state are created once at backend construction;
//! every failure there is fatal. Per-dispatch buffers are allocated inside
//! `dispatch` and released when the call returns.

use std::mem;

use objc2::rc::{autoreleasepool, Retained};
use objc2::runtime::ProtocolObject;
use objc2_foundation::NSString;
use objc2_metal::{
    MTLBuffer, MTLCommandBuffer, MTLCommandEncoder, MTLCommandQueue, MTLComputeCommandEncoder,
    MTLComputePipelineState, MTLCreateSystemDefaultDevice, MTLDevice, MTLLibrary,
    MTLResourceOptions, MTLSize,
};

use crate::error::{GrepError, Result};
use crate::search::types::MatchBatch;

use super::ComputeBackend;

/// Match kernel: each thread compares the pattern at its own candidate
/// offset, right to left, and on success takes a unique slot index from the
/// atomic counter. Offsets past `capacity` are counted but not stored.
const KERNEL_SOURCE: &str = r#"
#include <metal_stdlib>
using namespace metal;

struct KernelParams {
    uint candidate_count;
    uint pattern_len;
    uint capacity;
    uint _padding;
};

kernel void match_kernel(
    device const uchar* haystack    [[buffer(0)]],
    device const uchar* pattern     [[buffer(1)]],
    constant KernelParams& params   [[buffer(2)]],
    device uint* offsets            [[buffer(3)]],
    device atomic_uint* match_count [[buffer(4)]],
    uint tid [[thread_position_in_grid]])
{
    if (tid >= params.candidate_count) {
        return;
    }

    for (uint j = params.pattern_len; j > 0; j--) {
        if (haystack[tid + j - 1] != pattern[j - 1]) {
            return;
        }
    }

    uint slot = atomic_fetch_add_explicit(match_count, 1u, memory_order_relaxed);
    if (slot < params.capacity) {
        offsets[slot] = tid;
    }
}
"#;

/// Host-side params struct -- must match the MSL `KernelParams` layout.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
struct KernelParams {
    candidate_count: u32,
    pattern_len: u32,
    capacity: u32,
    _padding: u32,
}

// Compile-time layout assertion
const _: () = assert!(mem::size_of::<KernelParams>() == 16);

/// Metal comparison backend.
pub struct MetalBackend {
    device: Retained<ProtocolObject<dyn MTLDevice>>,
    command_queue: Retained<ProtocolObject<dyn MTLCommandQueue>>,
    pso: Retained<ProtocolObject<dyn MTLComputePipelineState>>,
}

impl MetalBackend {
    /// Acquire the default Metal device, compile the embedded kernel, and
    /// create the compute pipeline state.
    pub fn new() -> Result<Self> {
        let device = MTLCreateSystemDefaultDevice().ok_or(GrepError::DeviceNotFound)?;

        let ns_source = NSString::from_str(KERNEL_SOURCE);
        let library = device
            .newLibraryWithSource_options_error(&ns_source, None)
            .map_err(|e| GrepError::KernelCompilation(e.to_string()))?;

        let fn_name = NSString::from_str("match_kernel");
        #[allow(deprecated)]
        let function = library.newFunctionWithName(&fn_name).ok_or_else(|| {
            GrepError::KernelCompilation("kernel function 'match_kernel' not found".into())
        })?;

        let pso = device
            .newComputePipelineStateWithFunction_error(&function)
            .map_err(|e| GrepError::PipelineCreation(e.to_string()))?;

        let command_queue = device
            .newCommandQueue()
            .ok_or_else(|| GrepError::PipelineCreation("failed to create command queue".into()))?;

        Ok(Self {
            device,
            command_queue,
            pso,
        })
    }
}

impl ComputeBackend for MetalBackend {
    fn name(&self) -> &str {
        "metal"
    }

    fn dispatch(&self, haystack: &[u8], pattern: &[u8], capacity: usize) -> Result<MatchBatch> {
        let candidates = haystack.len() - pattern.len() + 1;
        let options = MTLResourceOptions::StorageModeShared;

        // Shared buffers for this dispatch only; the Retained handles drop
        // (and release) when this call returns, on every path.
        let haystack_buffer = self
            .device
            .newBufferWithLength_options(haystack.len(), options)
            .expect("Failed to allocate haystack buffer");
        let pattern_buffer = self
            .device
            .newBufferWithLength_options(pattern.len(), options)
            .expect("Failed to allocate pattern buffer");
        let params_buffer = self
            .device
            .newBufferWithLength_options(mem::size_of::<KernelParams>(), options)
            .expect("Failed to allocate params buffer");
        // Metal rejects zero-length buffers; keep one slot even at capacity 0.
        let offsets_buffer = self
            .device
            .newBufferWithLength_options(capacity.max(1) * mem::size_of::<u32>(), options)
            .expect("Failed to allocate offsets buffer");
        let match_count_buffer = self
            .device
            .newBufferWithLength_options(mem::size_of::<u32>(), options)
            .expect("Failed to allocate match count buffer");

        unsafe {
            let haystack_ptr = haystack_buffer.contents().as_ptr() as *mut u8;
            std::ptr::copy_nonoverlapping(haystack.as_ptr(), haystack_ptr, haystack.len());

            let pattern_ptr = pattern_buffer.contents().as_ptr() as *mut u8;
            std::ptr::copy_nonoverlapping(pattern.as_ptr(), pattern_ptr, pattern.len());

            let params_ptr = params_buffer.contents().as_ptr() as *mut KernelParams;
            *params_ptr = KernelParams {
                candidate_count: candidates as u32,
                pattern_len: pattern.len() as u32,
                capacity: capacity as u32,
                _padding: 0,
            };

            let count_ptr = match_count_buffer.contents().as_ptr() as *mut u32;
            *count_ptr = 0;
        }

        // Dispatch inside an autoreleasepool so command buffer and encoder
        // objects do not accumulate on non-main threads.
        autoreleasepool(|_| {
            let cmd = self
                .command_queue
                .commandBuffer()
                .expect("Failed to create command buffer");
            let encoder = cmd
                .computeCommandEncoder()
                .expect("Failed to create compute encoder");

            encoder.setComputePipelineState(&self.pso);
            unsafe {
                encoder.setBuffer_offset_atIndex(Some(&*haystack_buffer), 0, 0);
                encoder.setBuffer_offset_atIndex(Some(&*pattern_buffer), 0, 1);
                encoder.setBuffer_offset_atIndex(Some(&*params_buffer), 0, 2);
                encoder.setBuffer_offset_atIndex(Some(&*offsets_buffer), 0, 3);
                encoder.setBuffer_offset_atIndex(Some(&*match_count_buffer), 0, 4);
            }

            let grid_size = MTLSize {
                width: candidates,
                height: 1,
                depth: 1,
            };
            let tg_size = MTLSize {
                width: self.pso.maxTotalThreadsPerThreadgroup().min(candidates),
                height: 1,
                depth: 1,
            };

            encoder.dispatchThreads_threadsPerThreadgroup(grid_size, tg_size);
            encoder.endEncoding();

            cmd.commit();
            // The single host-observable suspension point: the counter and
            // offsets buffer must not be read before this returns.
            cmd.waitUntilCompleted();
        });

        let (total, offsets) = unsafe {
            let count_ptr = match_count_buffer.contents().as_ptr() as *const u32;
            let total = *count_ptr;

            let kept = (total as usize).min(capacity);
            let offsets_ptr = offsets_buffer.contents().as_ptr() as *const u32;
            let mut offsets = Vec::with_capacity(kept);
            for i in 0..kept {
                offsets.push(*offsets_ptr.add(i));
            }
            (total, offsets)
        };

        Ok(MatchBatch { offsets, total })
    }
}

// ============================================================================
// Tests (require a Metal device)
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::cpu::CpuBackend;
    use std::collections::BTreeSet;

    #[test]
    fn test_metal_matches_cpu_reference() {
        let backend = MetalBackend::new().expect("No Metal device");
        let haystack = b"fn main() {\n    let x = 1;\n}\nfn other() {}\n";
        let pattern = b"fn ";

        let gpu = backend.dispatch(haystack, pattern, 100).unwrap();
        let cpu = CpuBackend::new().dispatch(haystack, pattern, 100).unwrap();

        let gpu_set: BTreeSet<u32> = gpu.offsets.iter().copied().collect();
        let cpu_set: BTreeSet<u32> = cpu.offsets.iter().copied().collect();
        assert_eq!(gpu_set, cpu_set, "GPU match set must equal CPU reference");
        assert_eq!(gpu.total, cpu.total);
    }

    #[test]
    fn test_metal_overlapping_matches() {
        let backend = MetalBackend::new().expect("No Metal device");
        let batch = backend.dispatch(b"aaaa", b"aa", 10).unwrap();
        let got: BTreeSet<u32> = batch.offsets.iter().copied().collect();
        assert_eq!(got, BTreeSet::from([0, 1, 2]));
        assert_eq!(batch.total, 3);
    }

    #[test]
    fn test_metal_capacity_overflow() {
        let backend = MetalBackend::new().expect("No Metal device");
        let haystack = vec![b'x'; 50];
        let batch = backend.dispatch(&haystack, b"x", 8).unwrap();
        assert_eq!(batch.total, 50, "all matches counted past capacity");
        assert_eq!(batch.offsets.len(), 8, "retained set clamped to capacity");
        let unique: BTreeSet<u32> = batch.offsets.iter().copied().collect();
        assert_eq!(unique.len(), 8, "no slot written twice");
    }
}
