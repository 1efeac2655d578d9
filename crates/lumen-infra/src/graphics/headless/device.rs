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

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use lumen_core::math::LinearRgba;
use lumen_core::renderer::api::{
    BlendState, BufferId, BufferTarget, BufferUsage, ClearFlags, FilterMode, GraphicsBackendType,
    IndexFormat, PolygonMode, PrimitiveTopology, ProgramId, RendererAdapterInfo, ShaderStage,
    TextureFormat, TextureId, TextureUpload, UniformValue, VertexArrayId, VertexAttributePointer,
    Viewport, WrapMode,
};
use lumen_core::renderer::{GraphicsDevice, ResourceError, ShaderError};

use super::command::{DeviceCommand, DrawCall};

/// Texture units reported when none is configured; the GL 3.3 minimum.
pub const DEFAULT_TEXTURE_UNITS: u32 = 16;

#[derive(Debug)]
struct BufferRecord {
    data: Vec<u8>,
    usage: BufferUsage,
}

#[derive(Debug, Default)]
struct VertexArrayRecord {
    /// Keyed by slot.
    attributes: BTreeMap<u32, (BufferId, VertexAttributePointer)>,
    index_buffer: BufferId,
}

/// What a headless texture currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureInfo {
    /// Width in texels, 0 before the first upload.
    pub width: u32,
    /// Height in texels, 0 before the first upload.
    pub height: u32,
    /// Layout of the last upload.
    pub format: Option<TextureFormat>,
    /// Whether the mip chain was generated.
    pub mipmapped: bool,
    /// Wrap mode of the last upload.
    pub wrap: WrapMode,
    /// Filter of the last upload.
    pub filter: FilterMode,
}

#[derive(Debug)]
struct ProgramRecord {
    sources: String,
    uniforms: HashMap<String, UniformValue>,
}

#[derive(Debug, Default)]
struct Bindings {
    vertex_buffer: BufferId,
    /// The element binding while no vertex array is bound.
    loose_index_buffer: BufferId,
    vertex_array: VertexArrayId,
    program: ProgramId,
    active_unit: u32,
    units: BTreeMap<u32, TextureId>,
}

#[derive(Debug)]
struct State {
    next_id: u32,
    buffers: HashMap<BufferId, BufferRecord>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayRecord>,
    textures: HashMap<TextureId, TextureInfo>,
    programs: HashMap<ProgramId, ProgramRecord>,
    bindings: Bindings,
    depth_test: bool,
    blend: Option<BlendState>,
    polygon_mode: PolygonMode,
    clear_color: LinearRgba,
    viewport: Viewport,
    commands: Vec<DeviceCommand>,
    invalid_releases: usize,
}

impl State {
    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn invalid_release(&mut self, what: &str, id: u32) {
        self.invalid_releases += 1;
        log::error!("HeadlessDevice: Released unknown {what} {id} (double free?)");
    }
}

/// A [`GraphicsDevice`] that needs no GPU.
///
/// Ids are allocated from one counter shared by every object kind, so an id
/// of the wrong kind never aliases a live object. Destroying an id that is
/// not live is counted as an invalid release instead of being ignored.
#[derive(Debug)]
pub struct HeadlessDevice {
    state: RefCell<State>,
    max_texture_units: u32,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    /// Creates a device with [`DEFAULT_TEXTURE_UNITS`] texture units.
    pub fn new() -> Self {
        Self::with_max_texture_units(DEFAULT_TEXTURE_UNITS)
    }

    /// Creates a device reporting `units` texture units.
    pub fn with_max_texture_units(units: u32) -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 1,
                buffers: HashMap::new(),
                vertex_arrays: HashMap::new(),
                textures: HashMap::new(),
                programs: HashMap::new(),
                bindings: Bindings::default(),
                depth_test: false,
                blend: None,
                polygon_mode: PolygonMode::Fill,
                clear_color: LinearRgba::BLACK,
                viewport: Viewport::default(),
                commands: Vec::new(),
                invalid_releases: 0,
            }),
            max_texture_units: units,
        }
    }

    fn record(&self, command: DeviceCommand) {
        log::trace!("HeadlessDevice: {command:?}");
        self.state.borrow_mut().commands.push(command);
    }

    // --- Recorded calls ---

    /// Every call received so far, in order.
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.state.borrow().commands.clone()
    }

    /// Returns the recorded calls and starts a fresh recording.
    pub fn take_commands(&self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    /// Forgets the recorded calls. Object state is kept.
    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// The draw calls among the recorded calls.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter_map(|command| match command {
                DeviceCommand::DrawElements(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    // --- Object accounting ---

    /// Number of live buffers.
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Number of live vertex arrays.
    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    /// Number of live textures.
    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Number of live programs.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Number of live objects of every kind.
    pub fn live_objects(&self) -> usize {
        let state = self.state.borrow();
        state.buffers.len() + state.vertex_arrays.len() + state.textures.len() + state.programs.len()
    }

    /// Number of destroy calls that named an object that was not live.
    pub fn invalid_releases(&self) -> usize {
        self.state.borrow().invalid_releases
    }

    // --- Object content ---

    /// The bytes last written to a buffer.
    pub fn buffer_data(&self, id: BufferId) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&id).map(|b| b.data.clone())
    }

    /// The usage hint of the last write to a buffer.
    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        self.state.borrow().buffers.get(&id).map(|b| b.usage)
    }

    /// The enabled slots of a vertex array, sorted by slot.
    pub fn vertex_attributes(&self, id: VertexArrayId) -> Vec<(BufferId, VertexAttributePointer)> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&id)
            .map(|vao| vao.attributes.values().copied().collect())
            .unwrap_or_default()
    }

    /// The element buffer attached to a vertex array.
    pub fn index_buffer_of(&self, id: VertexArrayId) -> Option<BufferId> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&id)
            .map(|vao| vao.index_buffer)
    }

    /// What a texture currently holds.
    pub fn texture_info(&self, id: TextureId) -> Option<TextureInfo> {
        self.state.borrow().textures.get(&id).cloned()
    }

    /// The last value written to a uniform.
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.get(name).copied())
    }

    // --- Binding and pipeline state ---

    /// The bound vertex array.
    pub fn bound_vertex_array(&self) -> VertexArrayId {
        self.state.borrow().bindings.vertex_array
    }

    /// The program in use.
    pub fn current_program(&self) -> ProgramId {
        self.state.borrow().bindings.program
    }

    /// The active texture unit.
    pub fn active_texture_unit(&self) -> u32 {
        self.state.borrow().bindings.active_unit
    }

    /// The texture bound to `unit`, [`TextureId::NONE`] if none.
    pub fn texture_in_unit(&self, unit: u32) -> TextureId {
        self.state
            .borrow()
            .bindings
            .units
            .get(&unit)
            .copied()
            .unwrap_or(TextureId::NONE)
    }

    /// Whether depth testing is enabled.
    pub fn depth_test(&self) -> bool {
        self.state.borrow().depth_test
    }

    /// The blend state, `None` when blending is disabled.
    pub fn blend_state(&self) -> Option<BlendState> {
        self.state.borrow().blend
    }

    /// The rasterization mode.
    pub fn polygon_mode(&self) -> PolygonMode {
        self.state.borrow().polygon_mode
    }

    /// The clear color.
    pub fn clear_color(&self) -> LinearRgba {
        self.state.borrow().clear_color
    }

    /// The viewport.
    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }
}

/// Checks that a stage looks like a shader: non-blank with an entry point.
fn check_stage(stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    if source.trim().is_empty() {
        return Err(ShaderError::CompilationError {
            stage,
            details: "empty source".to_owned(),
        });
    }
    if !source.contains("main") {
        return Err(ShaderError::CompilationError {
            stage,
            details: "no entry point `main`".to_owned(),
        });
    }
    Ok(())
}

/// `material.diffuse1` -> `material`, `lights[0].color` -> `lights`.
fn uniform_root(name: &str) -> &str {
    name.split(['.', '[']).next().unwrap_or(name)
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer(&self) -> Result<BufferId, ResourceError> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = BufferId(state.allocate());
            state.buffers.insert(
                id,
                BufferRecord {
                    data: Vec::new(),
                    usage: BufferUsage::default(),
                },
            );
            id
        };
        self.record(DeviceCommand::CreateBuffer(id));
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) {
        if id.is_none() {
            return;
        }
        {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if state.buffers.remove(&id).is_none() {
                state.invalid_release("buffer", id.0);
                return;
            }
            let bindings = &mut state.bindings;
            if bindings.vertex_buffer == id {
                bindings.vertex_buffer = BufferId::NONE;
            }
            if bindings.loose_index_buffer == id {
                bindings.loose_index_buffer = BufferId::NONE;
            }
            // Deleting a buffer detaches it from every vertex array.
            for vao in state.vertex_arrays.values_mut() {
                if vao.index_buffer == id {
                    vao.index_buffer = BufferId::NONE;
                }
            }
        }
        self.record(DeviceCommand::DestroyBuffer(id));
    }

    fn write_buffer(
        &self,
        target: BufferTarget,
        id: BufferId,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        {
            let mut state = self.state.borrow_mut();
            let record = state
                .buffers
                .get_mut(&id)
                .ok_or(ResourceError::InvalidHandle)?;
            record.data = data.to_vec();
            record.usage = usage;
            match target {
                BufferTarget::Vertex => state.bindings.vertex_buffer = id,
                BufferTarget::Index => {
                    state.bindings.vertex_array = VertexArrayId::NONE;
                    state.bindings.loose_index_buffer = id;
                }
            }
        }
        self.record(DeviceCommand::WriteBuffer {
            target,
            id,
            len: data.len(),
            usage,
        });
        Ok(())
    }

    fn bind_buffer(&self, target: BufferTarget, id: BufferId) {
        {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            match target {
                BufferTarget::Vertex => state.bindings.vertex_buffer = id,
                BufferTarget::Index => {
                    let vao = state.bindings.vertex_array;
                    match state.vertex_arrays.get_mut(&vao) {
                        Some(record) => record.index_buffer = id,
                        None => state.bindings.loose_index_buffer = id,
                    }
                }
            }
        }
        self.record(DeviceCommand::BindBuffer { target, id });
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = VertexArrayId(state.allocate());
            state.vertex_arrays.insert(id, VertexArrayRecord::default());
            id
        };
        self.record(DeviceCommand::CreateVertexArray(id));
        Ok(id)
    }

    fn destroy_vertex_array(&self, id: VertexArrayId) {
        if id.is_none() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            if state.vertex_arrays.remove(&id).is_none() {
                state.invalid_release("vertex array", id.0);
                return;
            }
            if state.bindings.vertex_array == id {
                state.bindings.vertex_array = VertexArrayId::NONE;
            }
        }
        self.record(DeviceCommand::DestroyVertexArray(id));
    }

    fn bind_vertex_array(&self, id: VertexArrayId) {
        self.state.borrow_mut().bindings.vertex_array = id;
        self.record(DeviceCommand::BindVertexArray(id));
    }

    fn set_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        pointer: &VertexAttributePointer,
    ) -> Result<(), ResourceError> {
        {
            let mut state = self.state.borrow_mut();
            if !state.buffers.contains_key(&buffer) {
                return Err(ResourceError::InvalidHandle);
            }
            let record = state
                .vertex_arrays
                .get_mut(&vertex_array)
                .ok_or(ResourceError::InvalidHandle)?;
            record
                .attributes
                .insert(pointer.location, (buffer, *pointer));
            state.bindings.vertex_array = vertex_array;
            state.bindings.vertex_buffer = buffer;
        }
        self.record(DeviceCommand::SetVertexAttribute {
            vertex_array,
            buffer,
            pointer: *pointer,
        });
        Ok(())
    }

    fn set_index_buffer(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError> {
        {
            let mut state = self.state.borrow_mut();
            if !state.buffers.contains_key(&buffer) {
                return Err(ResourceError::InvalidHandle);
            }
            let record = state
                .vertex_arrays
                .get_mut(&vertex_array)
                .ok_or(ResourceError::InvalidHandle)?;
            record.index_buffer = buffer;
            state.bindings.vertex_array = vertex_array;
        }
        self.record(DeviceCommand::SetIndexBuffer {
            vertex_array,
            buffer,
        });
        Ok(())
    }

    fn create_texture(&self) -> Result<TextureId, ResourceError> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = TextureId(state.allocate());
            state.textures.insert(id, TextureInfo::default());
            id
        };
        self.record(DeviceCommand::CreateTexture(id));
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) {
        if id.is_none() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            if state.textures.remove(&id).is_none() {
                state.invalid_release("texture", id.0);
                return;
            }
            state.bindings.units.retain(|_, bound| *bound != id);
        }
        self.record(DeviceCommand::DestroyTexture(id));
    }

    fn upload_texture(
        &self,
        id: TextureId,
        upload: &TextureUpload<'_>,
    ) -> Result<(), ResourceError> {
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
        {
            let mut state = self.state.borrow_mut();
            let info = state
                .textures
                .get_mut(&id)
                .ok_or(ResourceError::InvalidHandle)?;
            *info = TextureInfo {
                width: upload.width,
                height: upload.height,
                format: Some(upload.format),
                mipmapped: upload.generate_mipmaps,
                wrap: upload.wrap,
                filter: upload.filter,
            };
            // Uploading goes through the active unit.
            let unit = state.bindings.active_unit;
            state.bindings.units.insert(unit, id);
        }
        self.record(DeviceCommand::UploadTexture {
            id,
            width: upload.width,
            height: upload.height,
            format: upload.format,
            generate_mipmaps: upload.generate_mipmaps,
        });
        Ok(())
    }

    fn bind_texture_unit(&self, unit: u32, id: TextureId) {
        if unit >= self.max_texture_units {
            log::warn!(
                "HeadlessDevice: Texture unit {} out of range (max {})",
                unit,
                self.max_texture_units
            );
        } else {
            let mut state = self.state.borrow_mut();
            state.bindings.active_unit = unit;
            if id.is_none() {
                state.bindings.units.remove(&unit);
            } else {
                state.bindings.units.insert(unit, id);
            }
        }
        self.record(DeviceCommand::BindTextureUnit { unit, id });
    }

    fn set_active_texture_unit(&self, unit: u32) {
        self.state.borrow_mut().bindings.active_unit = unit;
        self.record(DeviceCommand::SetActiveTextureUnit(unit));
    }

    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError> {
        check_stage(ShaderStage::Vertex, vertex_source)?;
        check_stage(ShaderStage::Fragment, fragment_source)?;
        let id = {
            let mut state = self.state.borrow_mut();
            let id = ProgramId(state.allocate());
            state.programs.insert(
                id,
                ProgramRecord {
                    sources: format!("{vertex_source}\n{fragment_source}"),
                    uniforms: HashMap::new(),
                },
            );
            id
        };
        self.record(DeviceCommand::CreateProgram(id));
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) {
        if id.is_none() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            if state.programs.remove(&id).is_none() {
                state.invalid_release("program", id.0);
                return;
            }
            if state.bindings.program == id {
                state.bindings.program = ProgramId::NONE;
            }
        }
        self.record(DeviceCommand::DestroyProgram(id));
    }

    fn use_program(&self, id: ProgramId) {
        self.state.borrow_mut().bindings.program = id;
        self.record(DeviceCommand::UseProgram(id));
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) -> bool {
        let accepted = {
            let mut state = self.state.borrow_mut();
            let accepted = match state.programs.get_mut(&program) {
                // A uniform is active when its root identifier occurs in the sources.
                Some(record) if !name.is_empty() && record.sources.contains(uniform_root(name)) => {
                    record.uniforms.insert(name.to_owned(), value);
                    true
                }
                _ => false,
            };
            if accepted {
                state.bindings.program = program;
            }
            accepted
        };
        if accepted {
            self.record(DeviceCommand::SetUniform {
                program,
                name: name.to_owned(),
                value,
            });
        }
        accepted
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u32,
    ) {
        let call = {
            let state = self.state.borrow();
            let bindings = &state.bindings;
            let index_buffer = state
                .vertex_arrays
                .get(&bindings.vertex_array)
                .map(|vao| vao.index_buffer)
                .unwrap_or(BufferId::NONE);

            if bindings.vertex_array.is_none() {
                log::error!("HeadlessDevice: draw_elements without a vertex array");
            } else if let Some(indices) = state.buffers.get(&index_buffer) {
                let needed = offset as usize + count as usize * format.size() as usize;
                if needed > indices.data.len() {
                    log::warn!(
                        "HeadlessDevice: draw reads {} index bytes, buffer holds {}",
                        needed,
                        indices.data.len()
                    );
                }
            }

            DrawCall {
                topology,
                count,
                format,
                offset,
                program: bindings.program,
                vertex_array: bindings.vertex_array,
                index_buffer,
                vertex_buffer: bindings.vertex_buffer,
                textures: bindings.units.iter().map(|(&u, &t)| (u, t)).collect(),
                active_unit: bindings.active_unit,
            }
        };
        self.record(DeviceCommand::DrawElements(call));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.state.borrow_mut().depth_test = enabled;
        self.record(DeviceCommand::SetDepthTest(enabled));
    }

    fn set_blend_state(&self, state: Option<BlendState>) {
        self.state.borrow_mut().blend = state;
        self.record(DeviceCommand::SetBlendState(state));
    }

    fn set_polygon_mode(&self, mode: PolygonMode) {
        self.state.borrow_mut().polygon_mode = mode;
        self.record(DeviceCommand::SetPolygonMode(mode));
    }

    fn set_clear_color(&self, color: LinearRgba) {
        self.state.borrow_mut().clear_color = color;
        self.record(DeviceCommand::SetClearColor(color));
    }

    fn clear(&self, flags: ClearFlags) {
        self.record(DeviceCommand::Clear(flags));
    }

    fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
        self.record(DeviceCommand::SetViewport(viewport));
    }

    fn adapter_info(&self) -> RendererAdapterInfo {
        RendererAdapterInfo {
            backend_type: GraphicsBackendType::Headless,
            name: "Headless".to_owned(),
            vendor: "lumen".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::api::AttributeKind;
    use std::borrow::Cow;

    fn pointer(location: u32) -> VertexAttributePointer {
        VertexAttributePointer {
            location,
            components: 3,
            kind: AttributeKind::Float,
            normalized: false,
            stride: 12,
            offset: 0,
        }
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let device = HeadlessDevice::new();
        let buffer = device.create_buffer().unwrap();
        let vao = device.create_vertex_array().unwrap();
        let texture = device.create_texture().unwrap();
        assert_ne!(buffer.0, vao.0);
        assert_ne!(vao.0, texture.0);
        assert!(!buffer.is_none());
        assert_eq!(device.live_objects(), 3);
    }

    #[test]
    fn test_double_destroy_is_counted() {
        let device = HeadlessDevice::new();
        let buffer = device.create_buffer().unwrap();
        device.destroy_buffer(buffer);
        device.destroy_buffer(buffer);
        device.destroy_buffer(BufferId::NONE);
        assert_eq!(device.live_buffers(), 0);
        assert_eq!(device.invalid_releases(), 1);
    }

    #[test]
    fn test_write_to_unknown_buffer_fails() {
        let device = HeadlessDevice::new();
        let result = device.write_buffer(
            BufferTarget::Vertex,
            BufferId(42),
            &[1, 2, 3],
            BufferUsage::StaticDraw,
        );
        assert!(matches!(result, Err(ResourceError::InvalidHandle)));
    }

    #[test]
    fn test_index_binding_is_vertex_array_state() {
        let device = HeadlessDevice::new();
        let vao = device.create_vertex_array().unwrap();
        let ibo = device.create_buffer().unwrap();
        device.bind_vertex_array(vao);
        device.bind_buffer(BufferTarget::Index, ibo);
        assert_eq!(device.index_buffer_of(vao), Some(ibo));

        // Uploading index data must not rewire the bound array.
        let other = device.create_buffer().unwrap();
        device
            .write_buffer(BufferTarget::Index, other, &[0; 12], BufferUsage::StaticDraw)
            .unwrap();
        assert_eq!(device.index_buffer_of(vao), Some(ibo));
        assert_eq!(device.bound_vertex_array(), VertexArrayId::NONE);
    }

    #[test]
    fn test_vertex_attributes_sorted_by_slot() {
        let device = HeadlessDevice::new();
        let vao = device.create_vertex_array().unwrap();
        let vbo = device.create_buffer().unwrap();
        device.set_vertex_attribute(vao, vbo, &pointer(1)).unwrap();
        device.set_vertex_attribute(vao, vbo, &pointer(0)).unwrap();
        let slots: Vec<u32> = device
            .vertex_attributes(vao)
            .iter()
            .map(|(_, p)| p.location)
            .collect();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn test_draw_snapshots_bindings() {
        let device = HeadlessDevice::new();
        let vao = device.create_vertex_array().unwrap();
        let ibo = device.create_buffer().unwrap();
        let texture = device.create_texture().unwrap();
        device
            .write_buffer(BufferTarget::Index, ibo, &[0; 12], BufferUsage::StaticDraw)
            .unwrap();
        device.set_index_buffer(vao, ibo).unwrap();
        device.bind_texture_unit(2, texture);
        device.set_active_texture_unit(0);
        device.bind_vertex_array(vao);
        device.draw_elements(PrimitiveTopology::TriangleList, 3, IndexFormat::Uint32, 0);

        let calls = device.draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].vertex_array, vao);
        assert_eq!(calls[0].index_buffer, ibo);
        assert_eq!(calls[0].textures, vec![(2, texture)]);
        assert_eq!(calls[0].active_unit, 0);
    }

    #[test]
    fn test_upload_checks_pixel_count() {
        let device = HeadlessDevice::new();
        let texture = device.create_texture().unwrap();
        let upload = TextureUpload {
            width: 2,
            height: 2,
            format: TextureFormat::Rgba8,
            pixels: Cow::Owned(vec![0; 15]),
            wrap: WrapMode::Repeat,
            filter: FilterMode::Linear,
            generate_mipmaps: true,
        };
        assert!(matches!(
            device.upload_texture(texture, &upload),
            Err(ResourceError::InvalidUpload(_))
        ));
        assert_eq!(device.texture_info(texture), Some(TextureInfo::default()));
    }

    #[test]
    fn test_uniforms_resolve_against_sources() {
        let device = HeadlessDevice::new();
        let program = device
            .create_program(
                "void main() { gl_Position = u_ViewProjection * vec4(0.0); }",
                "uniform Material material; void main() {}",
            )
            .unwrap();
        assert!(device.set_uniform(program, "material.diffuse1", UniformValue::Int(0)));
        assert!(!device.set_uniform(program, "u_Missing", UniformValue::Int(0)));
        assert_eq!(
            device.uniform(program, "material.diffuse1"),
            Some(UniformValue::Int(0))
        );
    }

    #[test]
    fn test_empty_stage_fails_to_compile() {
        let device = HeadlessDevice::new();
        let err = device.create_program("void main() {}", "   ").unwrap_err();
        assert!(matches!(
            err,
            ShaderError::CompilationError {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert_eq!(device.live_programs(), 0);
    }
}
