use super::*;
use crate::asset::import_shader_group;
use crate::content::CompiledShader;
use crate::resource::{HeadlessBackend, ShaderGroupId};

fn context_in(dir: &std::path::Path) -> (Arc<HeadlessBackend>, ContentContext) {
    let backend = Arc::new(HeadlessBackend::new());
    let context = ContentContext::new(ContentConfig::with_asset_root(dir), backend.clone());
    (backend, context)
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_context_is_shareable() {
    assert_send_sync::<ContentContext>();
}

#[test]
fn test_shader_asset_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (_backend, context) = context_in(dir.path());

    let shaders = vec![(1, CompiledShader::new(vec![0xFE; 4], [3; 16]))];
    let handle = import_shader_group(context.registry(), &dir.path().join("sky.hlsl"), &shaders).unwrap();

    let id = context.get_resource_from_asset(handle, AssetType::Shader, true).unwrap().unwrap();
    let shader = context.store().get_shader(ShaderGroupId::from(id.id()), 1);
    assert_eq!(shader.bytecode(), &[0xFE; 4]);

    assert!(context.release_resource(handle, AssetType::Shader));
    assert!(!context.release_resource(handle, AssetType::Shader));
    assert_eq!(context.store().shader_group_count(), 0);
}

#[test]
fn test_save_and_reload_through_context() {
    let dir = tempfile::tempdir().unwrap();
    let (_backend, context) = context_in(dir.path());
    let shaders = vec![(0, CompiledShader::new(Vec::new(), [0; 16]))];
    let handle = import_shader_group(context.registry(), &dir.path().join("a.hlsl"), &shaders).unwrap();
    context.save().unwrap();

    let (_backend, reloaded) = context_in(dir.path());
    assert_eq!(reloaded.load().unwrap(), 1);
    assert_eq!(reloaded.registry().get_asset(handle).unwrap().name, "a");
    assert_eq!(reloaded.config().asset_root, dir.path());
}
