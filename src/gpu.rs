// SPDX-License-Identifier: Apache-2.0

//! CUDA support for findx
//!
//! This module contains the CUDA-facing pieces used when `has_cuda` is enabled
//! (detected by `build.rs` when `nvcc` is available):
//!
//! - Buffer staging helpers over the CUDA runtime API
//! - PTX JIT/launch helpers over the driver API, with a process-wide module
//!   cache keyed by PTX content
//!
//! The search kernels themselves live in `search.rs` as embedded PTX.
use crate::constants::GPU_BLOCK_SIZE_MEDIUM;
use crate::types::FindxError;
use log::debug;
use std::collections::HashMap;
use std::ffi::{c_void, CStr, CString};
use std::ptr;
use std::sync::Mutex;

// CUDA runtime API declarations
unsafe extern "C" {
    pub(crate) fn cudaMalloc(ptr: *mut *mut c_void, size: usize) -> i32;
    pub(crate) fn cudaMemcpy(dst: *mut c_void, src: *const c_void, size: usize, kind: i32) -> i32;
    pub(crate) fn cudaFree(ptr: *mut c_void) -> i32;
    pub(crate) fn cudaDeviceSynchronize() -> i32;
}

pub(crate) const CUDA_MEMCPY_HOST_TO_DEVICE: i32 = 1;
pub(crate) const CUDA_MEMCPY_DEVICE_TO_HOST: i32 = 2;

// CUDA driver API declarations for raw FFI
#[repr(C)]
struct CUmod_st {
    _opaque: u8,
}
type CUmodule = *mut CUmod_st;

#[repr(C)]
struct CUfunc_st {
    _opaque: u8,
}
type CUfunction = *mut CUfunc_st;

#[repr(C)]
struct CUctx_st {
    _opaque: u8,
}
type CUcontext = *mut CUctx_st;

#[repr(C)]
struct CUstream_st {
    _opaque: u8,
}
type CUstream = *mut CUstream_st;

// Wrappers to make CUDA handles Send - the driver API is thread-safe
struct SendModule(CUmodule);
unsafe impl Send for SendModule {}
unsafe impl Sync for SendModule {}

struct SendContext(CUcontext);
unsafe impl Send for SendContext {}
unsafe impl Sync for SendContext {}

#[allow(non_camel_case_types)]
type CUresult = i32;

#[allow(non_camel_case_types)]
type CUjit_option = i32;

const CU_JIT_INFO_LOG_BUFFER: CUjit_option = 3;
const CU_JIT_INFO_LOG_BUFFER_SIZE_BYTES: CUjit_option = 4;
const CU_JIT_ERROR_LOG_BUFFER: CUjit_option = 5;
const CU_JIT_ERROR_LOG_BUFFER_SIZE_BYTES: CUjit_option = 6;

const CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK: i32 = 1;
const CU_DEVICE_ATTRIBUTE_WARP_SIZE: i32 = 10;
const CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT: i32 = 16;

unsafe extern "C" {
    fn cuInit(flags: u32) -> CUresult;
    fn cuDeviceGet(device: *mut i32, ordinal: i32) -> CUresult;
    fn cuDeviceGetName(name: *mut i8, len: i32, dev: i32) -> CUresult;
    fn cuDeviceGetAttribute(value: *mut i32, attrib: i32, dev: i32) -> CUresult;
    fn cuCtxCreate_v2(ctx: *mut CUcontext, flags: u32, dev: i32) -> CUresult;
    fn cuCtxSetCurrent(ctx: CUcontext) -> CUresult;
    fn cuModuleLoadDataEx(
        module: *mut CUmodule,
        image: *const c_void,
        num_options: u32,
        options: *mut CUjit_option,
        option_values: *mut *mut c_void,
    ) -> CUresult;
    fn cuModuleGetFunction(func: *mut CUfunction, module: CUmodule, name: *const i8) -> CUresult;
    fn cuLaunchKernel(
        f: CUfunction,
        grid_dim_x: u32,
        grid_dim_y: u32,
        grid_dim_z: u32,
        block_dim_x: u32,
        block_dim_y: u32,
        block_dim_z: u32,
        shared_mem_bytes: u32,
        stream: CUstream,
        kernel_params: *mut *mut c_void,
        extra: *mut *mut c_void,
    ) -> CUresult;
    fn cuStreamCreate(stream: *mut CUstream, flags: u32) -> CUresult;
    fn cuStreamSynchronize(stream: CUstream) -> CUresult;
}

/// Cached GPU device properties
#[derive(Debug, Clone)]
pub struct GpuDeviceProperties {
    pub name: String,
    pub multiprocessor_count: i32,
    pub max_threads_per_block: i32,
    pub warp_size: i32,
}

// Global caches - accessible from any thread
lazy_static::lazy_static! {
    static ref MODULE_CACHE: Mutex<HashMap<String, SendModule>> = Mutex::new(HashMap::new());
    static ref CUDA_INITIALIZED: Mutex<bool> = Mutex::new(false);
    static ref GPU_PROPERTIES: Mutex<Option<GpuDeviceProperties>> = Mutex::new(None);
    static ref CUDA_CONTEXT: Mutex<Option<SendContext>> = Mutex::new(None);
    // Serialize module cache access and JIT compilation
    static ref GPU_LAUNCH_MUTEX: Mutex<()> = Mutex::new(());
}

// Thread-local stream so each thread launches on its own stream
thread_local! {
    static THREAD_STREAM: std::cell::RefCell<Option<CUstream>> =
        const { std::cell::RefCell::new(None) };
}

// Initialize CUDA if not already done, and bind the shared context to the
// calling thread.
pub(crate) fn ensure_cuda_initialized() -> Result<(), FindxError> {
    let mut initialized = CUDA_INITIALIZED.lock().unwrap();
    if !*initialized {
        unsafe {
            let result = cuInit(0);
            if result != 0 {
                debug!("FINDX GPU: cuInit failed code={}", result);
                return Err(FindxError::Cuda(format!("cuInit failed: {}", result)));
            }

            let mut device = 0;
            let result = cuDeviceGet(&mut device, 0);
            if result != 0 {
                debug!("FINDX GPU: cuDeviceGet failed code={}", result);
                return Err(FindxError::Cuda(format!("cuDeviceGet failed: {}", result)));
            }

            let mut ctx = ptr::null_mut();
            let result = cuCtxCreate_v2(&mut ctx, 0, device);
            if result != 0 {
                debug!("FINDX GPU: cuCtxCreate_v2 failed code={}", result);
                return Err(FindxError::Cuda(format!("cuCtxCreate failed: {}", result)));
            }

            let mut ctx_cache = CUDA_CONTEXT.lock().unwrap();
            *ctx_cache = Some(SendContext(ctx));
        }
        *initialized = true;
    }

    unsafe {
        if let Some(ref ctx) = *CUDA_CONTEXT.lock().unwrap() {
            let result = cuCtxSetCurrent(ctx.0);
            if result != 0 {
                debug!("FINDX GPU: cuCtxSetCurrent failed code={}", result);
                return Err(FindxError::Cuda(format!(
                    "cuCtxSetCurrent failed: {}",
                    result
                )));
            }
        }
    }

    Ok(())
}

/// Get GPU device properties (cached after first call)
pub fn get_gpu_properties() -> Result<GpuDeviceProperties, FindxError> {
    ensure_cuda_initialized()?;

    let mut props_cache = GPU_PROPERTIES.lock().unwrap();
    if let Some(ref props) = *props_cache {
        return Ok(props.clone());
    }

    unsafe {
        let device = 0i32;

        let mut name_bytes = vec![0i8; 256];
        let result = cuDeviceGetName(name_bytes.as_mut_ptr(), 256, device);
        if result != 0 {
            return Err(FindxError::Cuda(format!(
                "cuDeviceGetName failed: {}",
                result
            )));
        }

        // Fixed-size buffer returned by CUDA; interpret as C string without ownership
        let name = CStr::from_ptr(name_bytes.as_ptr())
            .to_string_lossy()
            .to_string();

        let get_attribute = |attr: i32| -> Result<i32, FindxError> {
            let mut value = 0i32;
            let result = cuDeviceGetAttribute(&mut value, attr, device);
            if result != 0 {
                return Err(FindxError::Cuda(format!(
                    "cuDeviceGetAttribute failed: {}",
                    result
                )));
            }
            Ok(value)
        };

        let props = GpuDeviceProperties {
            name,
            multiprocessor_count: get_attribute(CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT)?,
            max_threads_per_block: get_attribute(CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK)?,
            warp_size: get_attribute(CU_DEVICE_ATTRIBUTE_WARP_SIZE)?,
        };

        *props_cache = Some(props.clone());
        Ok(props)
    }
}

// Get or create a stream for this thread
fn get_thread_stream() -> Result<CUstream, FindxError> {
    THREAD_STREAM.with(|stream_cell| {
        let mut stream_opt = stream_cell.borrow_mut();
        if stream_opt.is_none() {
            let mut stream = ptr::null_mut();
            unsafe {
                let result = cuStreamCreate(&mut stream, 0);
                if result != 0 {
                    return Err(FindxError::Cuda(format!(
                        "cuStreamCreate failed: {}",
                        result
                    )));
                }
            }
            *stream_opt = Some(stream);
        }
        Ok(stream_opt.unwrap())
    })
}

/// Launch configurations for the search kernels
pub struct LaunchConfig;

impl LaunchConfig {
    /// For reduction-style kernels (the first-match kernels atomically reduce
    /// into a single slot). Fewer blocks limit atomic contention.
    pub fn reduction() -> (u32, u32) {
        let threads = GPU_BLOCK_SIZE_MEDIUM as u32;
        if let Ok(props) = get_gpu_properties() {
            let blocks = (props.multiprocessor_count as u32 * 2).min(256);
            (blocks, threads)
        } else {
            (80, threads) // Fallback: 80 blocks
        }
    }
}

/// JIT-compile (cached) and launch an embedded PTX kernel.
///
/// `args` must contain one pointer per kernel parameter, each pointing at the
/// host storage of the parameter value.
pub fn launch_ptx(
    ptx_code: &'static str,
    kernel_name: &str,
    blocks: u32,
    threads: u32,
    args: &[*const u8],
) -> Result<(), FindxError> {
    debug!("FINDX GPU: launch_ptx kernel={}", kernel_name);
    ensure_cuda_initialized()?;

    let module = {
        // Hold the launch mutex for context binding and module cache/JIT only
        let _gpu_lock = GPU_LAUNCH_MUTEX.lock().unwrap();

        unsafe {
            if let Some(ref ctx) = *CUDA_CONTEXT.lock().unwrap() {
                let result = cuCtxSetCurrent(ctx.0);
                if result != 0 {
                    return Err(FindxError::Cuda(format!(
                        "cuCtxSetCurrent failed: {}",
                        result
                    )));
                }
            }
        }

        // Cache modules by PTX content (FNV-1a), not kernel name
        let mut hash: u64 = 0xcbf29ce484222325;
        for &b in ptx_code.as_bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        let key = format!("ptx:{:016x}", hash);

        let mut cache = MODULE_CACHE.lock().unwrap();
        if !cache.contains_key(&key) {
            let mut error_log: Vec<i8> = vec![0; 8192];
            let mut info_log: Vec<i8> = vec![0; 8192];
            let mut options: [CUjit_option; 4] = [
                CU_JIT_ERROR_LOG_BUFFER,
                CU_JIT_ERROR_LOG_BUFFER_SIZE_BYTES,
                CU_JIT_INFO_LOG_BUFFER,
                CU_JIT_INFO_LOG_BUFFER_SIZE_BYTES,
            ];
            let mut option_values: [*mut c_void; 4] = [
                error_log.as_mut_ptr() as *mut c_void,
                error_log.len() as *mut c_void,
                info_log.as_mut_ptr() as *mut c_void,
                info_log.len() as *mut c_void,
            ];

            let mut module = ptr::null_mut();
            let ptx_cstring = CString::new(ptx_code)
                .map_err(|e| FindxError::InvalidPtx(format!("embedded NUL: {}", e)))?;
            unsafe {
                let result = cuModuleLoadDataEx(
                    &mut module,
                    ptx_cstring.as_ptr() as *const c_void,
                    options.len() as u32,
                    options.as_mut_ptr(),
                    option_values.as_mut_ptr(),
                );
                if result != 0 {
                    let len = error_log
                        .iter()
                        .position(|&c| c == 0)
                        .unwrap_or(error_log.len());
                    let err = {
                        let ptr = error_log.as_ptr() as *const u8;
                        let slice = std::slice::from_raw_parts(ptr, len);
                        String::from_utf8_lossy(slice).to_string()
                    };
                    debug!(
                        "FINDX GPU: cuModuleLoadDataEx failed (result={}) | error_log=\"{}\"",
                        result, err
                    );
                    return Err(FindxError::InvalidPtx(format!(
                        "cuModuleLoadDataEx failed: {} | {}",
                        result, err
                    )));
                }
            }
            cache.insert(key.clone(), SendModule(module));
        }

        cache.get(&key).map(|m| m.0).ok_or_else(|| {
            FindxError::Internal("module cache lookup failed after insert".to_string())
        })?
    };

    let kernel_cstring = CString::new(kernel_name)
        .map_err(|e| FindxError::Internal(format!("invalid kernel name: {}", e)))?;
    let mut function = ptr::null_mut();
    unsafe {
        let result = cuModuleGetFunction(&mut function, module, kernel_cstring.as_ptr());
        if result != 0 {
            return Err(FindxError::Cuda(format!(
                "cuModuleGetFunction failed: {}",
                result
            )));
        }
    }

    let stream = get_thread_stream()?;

    unsafe {
        // CUDA expects an array of pointers to the parameter values
        let mut kernel_params: Vec<*mut c_void> =
            args.iter().map(|&arg| arg as *mut c_void).collect();

        debug!(
            "FINDX GPU: cuLaunchKernel blocks={} threads={} args={}",
            blocks,
            threads,
            kernel_params.len()
        );
        let result = cuLaunchKernel(
            function,
            blocks,
            1,
            1,
            threads,
            1,
            1,
            0,
            stream,
            kernel_params.as_mut_ptr(),
            ptr::null_mut(),
        );
        if result != 0 {
            return Err(FindxError::Cuda(format!(
                "cuLaunchKernel failed: {}",
                result
            )));
        }

        let result = cuStreamSynchronize(stream);
        if result != 0 {
            return Err(FindxError::Cuda(format!(
                "cuStreamSynchronize failed: {}",
                result
            )));
        }
    }

    Ok(())
}

/// Stage a host buffer on the device, run a first-match kernel against it, and
/// read the winning index back.
///
/// The result slot is a single u64 pre-initialized to `len` (the not-found
/// sentinel); kernels lower it with `atom.global.min.u64`. `compute_fn`
/// receives the device data pointer, the element count, and the device result
/// pointer.
///
/// # Safety
/// `input_ptr` must point to at least `size_bytes` readable bytes that stay
/// valid for the duration of the call.
pub(crate) unsafe fn with_gpu_buffer_find<F>(
    input_ptr: *const c_void,
    size_bytes: usize,
    len: usize,
    compute_fn: F,
) -> Result<u64, FindxError>
where
    F: FnOnce(*const c_void, usize, *mut c_void) -> Result<(), FindxError>,
{
    let mut gpu_data: *mut c_void = ptr::null_mut();
    if cudaMalloc(&mut gpu_data as *mut *mut c_void, size_bytes) != 0 {
        return Err(FindxError::Cuda(
            "GPU memory allocation failed".to_string(),
        ));
    }

    let mut gpu_result: *mut c_void = ptr::null_mut();
    if cudaMalloc(
        &mut gpu_result as *mut *mut c_void,
        std::mem::size_of::<u64>(),
    ) != 0
    {
        cudaFree(gpu_data);
        return Err(FindxError::Cuda(
            "GPU memory allocation for result failed".to_string(),
        ));
    }

    if cudaMemcpy(gpu_data, input_ptr, size_bytes, CUDA_MEMCPY_HOST_TO_DEVICE) != 0 {
        cudaFree(gpu_data);
        cudaFree(gpu_result);
        return Err(FindxError::Cuda("GPU memory copy failed".to_string()));
    }

    // Not-found sentinel: the sequence length
    let init_result = len as u64;
    if cudaMemcpy(
        gpu_result,
        &init_result as *const u64 as *const c_void,
        std::mem::size_of::<u64>(),
        CUDA_MEMCPY_HOST_TO_DEVICE,
    ) != 0
    {
        cudaFree(gpu_data);
        cudaFree(gpu_result);
        return Err(FindxError::Cuda(
            "GPU memory copy for result init failed".to_string(),
        ));
    }

    if let Err(e) = compute_fn(gpu_data as *const c_void, len, gpu_result) {
        cudaFree(gpu_data);
        cudaFree(gpu_result);
        return Err(e);
    }

    if cudaDeviceSynchronize() != 0 {
        cudaFree(gpu_data);
        cudaFree(gpu_result);
        return Err(FindxError::Cuda(
            "GPU device synchronize failed".to_string(),
        ));
    }

    let mut result: u64 = 0;
    if cudaMemcpy(
        &mut result as *mut u64 as *mut c_void,
        gpu_result as *const c_void,
        std::mem::size_of::<u64>(),
        CUDA_MEMCPY_DEVICE_TO_HOST,
    ) != 0
    {
        cudaFree(gpu_data);
        cudaFree(gpu_result);
        return Err(FindxError::Cuda(
            "GPU memory copy back failed".to_string(),
        ));
    }

    cudaFree(gpu_data);
    cudaFree(gpu_result);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_config_uses_standard_block_size() {
        let (blocks, threads) = LaunchConfig::reduction();
        assert_eq!(threads, GPU_BLOCK_SIZE_MEDIUM as u32);
        assert!(blocks >= 1);
    }
}
