// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cell::Cell;
use std::fmt;
use std::num::NonZeroU32;

use glow::HasContext;
use lumen_core::math::LinearRgba;
use lumen_core::renderer::api::{
    AttributeKind, BlendState, BufferId, BufferTarget, BufferUsage, ClearFlags, GraphicsBackendType,
    IndexFormat, PolygonMode, PrimitiveTopology, ProgramId, RendererAdapterInfo, ShaderStage,
    TextureId, TextureUpload, UniformValue, VertexArrayId, VertexAttributePointer, Viewport,
};
use lumen_core::renderer::{GraphicsDevice, ResourceError, ShaderError};

use super::conversions::{min_filter, IntoGl};

/// OpenGL 3.3 core implementation of [`GraphicsDevice`].
///
/// Our ids are the raw GL object names, so no lookup table is needed. The
/// context must stay current on the calling thread for the lifetime of the
/// device.
pub struct GlDevice {
    gl: glow::Context,
    max_texture_units: u32,
    live_objects: Cell<usize>,
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice")
            .field("max_texture_units", &self.max_texture_units)
            .field("live_objects", &self.live_objects.get())
            .finish_non_exhaustive()
    }
}

fn native<T>(id: u32, wrap: impl FnOnce(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(id).map(wrap)
}

impl GlDevice {
    /// Wraps a loaded context. The context must be current.
    pub fn new(gl: glow::Context) -> Self {
        let max_texture_units =
            unsafe { gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS) }.max(1) as u32;
        let device = Self {
            gl,
            max_texture_units,
            live_objects: Cell::new(0),
        };
        let info = device.adapter_info();
        log::info!(
            "GlDevice: {} ({}), version {}, {} texture units",
            info.name,
            info.vendor,
            info.version,
            max_texture_units
        );
        device
    }

    /// Borrows the raw context, for code outside the pipeline (UI overlays, ...).
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Number of GL objects created through this device and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.live_objects.get()
    }

    fn track_created(&self) {
        self.live_objects.set(self.live_objects.get() + 1);
    }

    fn track_destroyed(&self) {
        self.live_objects.set(self.live_objects.get().saturating_sub(1));
    }

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, ShaderError> {
        unsafe {
            let shader = self
                .gl
                .create_shader(stage.into_gl())
                .map_err(|details| ShaderError::CompilationError { stage, details })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let details = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(ShaderError::CompilationError { stage, details });
            }
            Ok(shader)
        }
    }
}

impl GraphicsDevice for GlDevice {
    fn create_buffer(&self) -> Result<BufferId, ResourceError> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(ResourceError::AllocationFailed)?;
        self.track_created();
        let id = BufferId(buffer.0.get());
        log::debug!("GlDevice: Created buffer with ID: {id:?}");
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) {
        if let Some(buffer) = native(id.0, glow::NativeBuffer) {
            unsafe { self.gl.delete_buffer(buffer) };
            self.track_destroyed();
            log::debug!("GlDevice: Destroyed buffer with ID: {id:?}");
        }
    }

    fn write_buffer(
        &self,
        target: BufferTarget,
        id: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        let buffer = native(id.0, glow::NativeBuffer).ok_or(ResourceError::InvalidHandle)?;
        unsafe {
            if target == BufferTarget::Index {
                // The element binding is vertex-array state: upload outside any array.
                self.gl.bind_vertex_array(None);
            }
            self.gl.bind_buffer(target.into_gl(), Some(buffer));
            self.gl
                .buffer_data_u8_slice(target.into_gl(), data, usage.into_gl());
        }
        log::trace!(
            "GlDevice: Wrote {} bytes to buffer ID: {:?} ({:?})",
            data.len(),
            id,
            target
        );
        Ok(())
    }

    fn bind_buffer(&self, target: BufferTarget, id: BufferId) {
        unsafe {
            self.gl
                .bind_buffer(target.into_gl(), native(id.0, glow::NativeBuffer))
        };
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        let vao =
            unsafe { self.gl.create_vertex_array() }.map_err(ResourceError::AllocationFailed)?;
        self.track_created();
        let id = VertexArrayId(vao.0.get());
        log::debug!("GlDevice: Created vertex array with ID: {id:?}");
        Ok(id)
    }

    fn destroy_vertex_array(&self, id: VertexArrayId) {
        if let Some(vao) = native(id.0, glow::NativeVertexArray) {
            unsafe { self.gl.delete_vertex_array(vao) };
            self.track_destroyed();
            log::debug!("GlDevice: Destroyed vertex array with ID: {id:?}");
        }
    }

    fn bind_vertex_array(&self, id: VertexArrayId) {
        unsafe {
            self.gl
                .bind_vertex_array(native(id.0, glow::NativeVertexArray))
        };
    }

    fn set_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        pointer: &VertexAttributePointer,
    ) -> Result<(), ResourceError> {
        let vao =
            native(vertex_array.0, glow::NativeVertexArray).ok_or(ResourceError::InvalidHandle)?;
        let vbo = native(buffer.0, glow::NativeBuffer).ok_or(ResourceError::InvalidHandle)?;
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.enable_vertex_attrib_array(pointer.location);
            match pointer.kind {
                AttributeKind::Float => self.gl.vertex_attrib_pointer_f32(
                    pointer.location,
                    pointer.components as i32,
                    pointer.kind.into_gl(),
                    pointer.normalized,
                    pointer.stride as i32,
                    pointer.offset as i32,
                ),
                AttributeKind::Int | AttributeKind::Bool => self.gl.vertex_attrib_pointer_i32(
                    pointer.location,
                    pointer.components as i32,
                    pointer.kind.into_gl(),
                    pointer.stride as i32,
                    pointer.offset as i32,
                ),
            }
        }
        log::trace!("GlDevice: {vertex_array:?} slot {pointer:?}");
        Ok(())
    }

    fn set_index_buffer(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError> {
        let vao =
            native(vertex_array.0, glow::NativeVertexArray).ok_or(ResourceError::InvalidHandle)?;
        let ibo = native(buffer.0, glow::NativeBuffer).ok_or(ResourceError::InvalidHandle)?;
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        }
        Ok(())
    }

    fn create_texture(&self) -> Result<TextureId, ResourceError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(ResourceError::AllocationFailed)?;
        self.track_created();
        let id = TextureId(texture.0.get());
        log::debug!("GlDevice: Created texture with ID: {id:?}");
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) {
        if let Some(texture) = native(id.0, glow::NativeTexture) {
            unsafe { self.gl.delete_texture(texture) };
            self.track_destroyed();
            log::debug!("GlDevice: Destroyed texture with ID: {id:?}");
        }
    }

    fn upload_texture(
        &self,
        id: TextureId,
        upload: &TextureUpload<'_>,
    ) -> Result<(), ResourceError> {
        let texture = native(id.0, glow::NativeTexture).ok_or(ResourceError::InvalidHandle)?;
        if !upload.is_consistent() {
            return Err(ResourceError::InvalidUpload(format!(
                "expected {} bytes for {}x{} {:?}, got {}",
                upload.expected_len(),
                upload.width,
                upload.height,
                upload.format,
                upload.pixels.len()
            )));
        }
        let (internal_format, format) = upload.format.into_gl();
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // Rows of 1- and 3-channel images are not 4-byte aligned.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format,
                upload.width as i32,
                upload.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(upload.pixels.as_ref()),
            );
            if upload.generate_mipmaps {
                self.gl.generate_mipmap(glow::TEXTURE_2D);
            }
            let wrap = upload.wrap.into_gl();
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                min_filter(upload.filter, upload.generate_mipmaps),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                upload.filter.into_gl(),
            );
        }
        log::debug!(
            "GlDevice: Uploaded {}x{} {:?} into texture ID: {:?}",
            upload.width,
            upload.height,
            upload.format,
            id
        );
        Ok(())
    }

    fn bind_texture_unit(&self, unit: u32, id: TextureId) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, native(id.0, glow::NativeTexture));
        }
    }

    fn set_active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, vertex_source)?;
        let fragment = match self.compile_stage(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(e) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(details) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    return Err(ShaderError::LinkError { details });
                }
            };
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);

            // The stages are no longer needed once the program is linked.
            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !linked {
                let details = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(ShaderError::LinkError { details });
            }

            self.track_created();
            let id = ProgramId(program.0.get());
            log::debug!("GlDevice: Linked program with ID: {id:?}");
            Ok(id)
        }
    }

    fn destroy_program(&self, id: ProgramId) {
        if let Some(program) = native(id.0, glow::NativeProgram) {
            unsafe { self.gl.delete_program(program) };
            self.track_destroyed();
            log::debug!("GlDevice: Destroyed program with ID: {id:?}");
        }
    }

    fn use_program(&self, id: ProgramId) {
        unsafe { self.gl.use_program(native(id.0, glow::NativeProgram)) };
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) -> bool {
        let Some(native_program) = native(program.0, glow::NativeProgram) else {
            return false;
        };
        unsafe {
            let Some(location) = self.gl.get_uniform_location(native_program, name) else {
                return false;
            };
            self.gl.use_program(Some(native_program));
            let location = Some(&location);
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Bool(v) => self.gl.uniform_1_i32(location, v as i32),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
        true
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u32,
    ) {
        unsafe {
            self.gl.draw_elements(
                topology.into_gl(),
                count as i32,
                format.into_gl(),
                offset as i32,
            )
        };
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_blend_state(&self, state: Option<BlendState>) {
        unsafe {
            match state {
                Some(state) => {
                    self.gl.enable(glow::BLEND);
                    self.gl
                        .blend_func(state.src_factor.into_gl(), state.dst_factor.into_gl());
                }
                None => self.gl.disable(glow::BLEND),
            }
        }
    }

    fn set_polygon_mode(&self, mode: PolygonMode) {
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode.into_gl()) };
    }

    fn set_clear_color(&self, color: LinearRgba) {
        unsafe { self.gl.clear_color(color.r, color.g, color.b, color.a) };
    }

    fn clear(&self, flags: ClearFlags) {
        unsafe { self.gl.clear(flags.into_gl()) };
    }

    fn set_viewport(&self, viewport: Viewport) {
        unsafe {
            self.gl.viewport(
                viewport.x,
                viewport.y,
                viewport.width as i32,
                viewport.height as i32,
            )
        };
    }

    fn adapter_info(&self) -> RendererAdapterInfo {
        unsafe {
            RendererAdapterInfo {
                backend_type: GraphicsBackendType::OpenGL,
                name: self.gl.get_parameter_string(glow::RENDERER),
                vendor: self.gl.get_parameter_string(glow::VENDOR),
                version: self.gl.get_parameter_string(glow::VERSION),
            }
        }
    }
}
