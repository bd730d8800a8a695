pub mod compile_shader;
pub mod create_device;
pub mod create_pipeline_states;
pub mod create_root_signature;
pub mod depth_stencil;
pub mod descriptor_arena;
pub mod frame_sync;
pub mod load_assets;
pub mod mesh;
pub mod model;
pub mod populate_command_list;
pub mod resources;
pub mod sample;
pub mod sample_bind_to_window;
pub mod sample_new;
pub mod sample_on_destroy;
pub mod sample_render;
pub mod texture_loader;
pub mod transition_barrier;
pub mod write_buffer;
