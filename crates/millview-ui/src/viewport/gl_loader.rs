use libloading::Library;
use std::ffi::{c_void, CString};
use std::sync::OnceLock;

struct GlLibraries {
    epoxy: Option<Library>,
    gl: Option<Library>,
}

static GL_LIBRARIES: OnceLock<GlLibraries> = OnceLock::new();

fn libraries() -> &'static GlLibraries {
    GL_LIBRARIES.get_or_init(|| unsafe {
        GlLibraries {
            epoxy: Library::new("libepoxy.so.0")
                .or_else(|_| Library::new("libepoxy.so"))
                .ok(),
            gl: Library::new("libGL.so.1")
                .or_else(|_| Library::new("libGL.so"))
                .ok(),
        }
    })
}

/// Whether any library that can resolve GL entry points is present.
pub(crate) fn gl_available() -> bool {
    let libs = libraries();
    libs.epoxy.is_some() || libs.gl.is_some()
}

/// Loader for `glow::Context::from_loader_function`.
pub(crate) fn load_gl_func(name: &str) -> *const c_void {
    let Ok(c_name) = CString::new(name) else {
        return std::ptr::null();
    };
    let libs = libraries();

    unsafe {
        // Try epoxy first
        if let Some(lib) = libs.epoxy.as_ref() {
            if let Ok(get_proc_addr) = lib
                .get::<unsafe extern "C" fn(*const std::ffi::c_char) -> *const c_void>(
                    b"epoxy_get_proc_addr",
                )
            {
                let ptr = get_proc_addr(c_name.as_ptr());
                if !ptr.is_null() {
                    return ptr;
                }
            }
            if let Ok(sym) = lib.get::<*const c_void>(c_name.as_bytes_with_nul()) {
                return *sym;
            }
        }

        // Try libGL as fallback
        if let Some(lib) = libs.gl.as_ref() {
            if let Ok(sym) = lib.get::<*const c_void>(c_name.as_bytes_with_nul()) {
                return *sym;
            }
        }
    }

    std::ptr::null()
}
