use hidden_surface::config::Settings;
use hidden_surface::{obj, shapes, Color, HiddenSurface, Renderer, Scene, SceneError, Texture};
use nalgebra_glm::vec3;
use std::path::PathBuf;

const USAGE: &str = "usage: hidden-surface [--algorithm NAME] [--config FILE.ron] [--obj FILE.obj] [--texture IMAGE] [--out FILE.png] [--window] [OBJECT...]";

#[derive(Debug, Default)]
struct Args { algorithm: Option<String>, config: Option<PathBuf>, obj: Option<PathBuf>, texture: Option<PathBuf>, out: Option<PathBuf>, window: bool, objects: Vec<String> }

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().ok_or_else(|| format!("{} needs a value\n{}", flag, USAGE));
        match arg.as_str() {
            "-a" | "--algorithm" => args.algorithm = Some(value(&arg)?),
            "-c" | "--config" => args.config = Some(value(&arg)?.into()),
            "--obj" => args.obj = Some(value(&arg)?.into()),
            "-t" | "--texture" => args.texture = Some(value(&arg)?.into()),
            "-o" | "--out" => args.out = Some(value(&arg)?.into()),
            "-w" | "--window" => args.window = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag {}\n{}", flag, USAGE)),
            name => args.objects.push(name.to_string()),
        }
    }
    Ok(args)
}

fn load_texture(settings: &Settings) -> Result<Option<Texture>, SceneError> {
    let Some(path) = &settings.texture else { return Ok(None) };
    let img = image::open(path)?.to_rgb8();
    log::info!("Loaded texture {:?} ({}x{})", path, img.width(), img.height());
    Ok(Some(Texture::from_image(&img)?))
}

fn build_scene(settings: &Settings, obj_path: Option<&PathBuf>) -> Result<Scene, SceneError> {
    let mut scene = shapes::demo_scene(&settings.objects);
    if let Some(path) = obj_path {
        for mesh in obj::load_obj(path, vec3(0.0, 0.0, 5.0), Color::new(200, 200, 200))? { scene.push(mesh); }
    }
    Ok(scene)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = match parse_args() { Ok(a) => a, Err(msg) => { eprintln!("{}", msg); std::process::exit(2); } };

    let mut settings = match &args.config { Some(path) => Settings::load(path)?, None => Settings::default() };
    if let Some(name) = &args.algorithm { settings.algorithm = name.clone(); }
    if let Some(path) = &args.texture { settings.texture = Some(path.clone()); }
    if !args.objects.is_empty() { settings.objects = args.objects.clone(); }

    let texture = load_texture(&settings)?;
    let scene = build_scene(&settings, args.obj.as_ref())?;
    let renderer = Renderer::from_settings(&settings, texture.clone())?;
    let camera = settings.camera();
    let light = settings.light();
    log::info!("Rendering {} objects with {}", scene.objects.len(), renderer.name());

    if args.window { return run_window(&settings, renderer, texture, &scene); }

    let frame = renderer.render(&scene, &camera, light.as_ref());
    let out = args.out.unwrap_or_else(|| PathBuf::from("render.png"));
    frame.to_rgb_image().save(&out)?;
    log::info!("Wrote {:?}", out);
    Ok(())
}

#[cfg(feature = "window")]
fn run_window(settings: &Settings, mut renderer: Renderer, texture: Option<Texture>, scene: &Scene) -> Result<(), Box<dyn std::error::Error>> {
    use hidden_surface::Algorithm;
    use minifb::{Key, KeyRepeat, Window, WindowOptions};

    let (w, h) = (settings.render.width, settings.render.height);
    let mut window = Window::new(&format!("Hidden Surface - {}", renderer.name()), w, h, WindowOptions::default())?;
    window.set_target_fps(30);
    let mut camera = settings.camera();
    let light = settings.light();
    let keys = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6, Key::Key7];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_down(Key::Left) { camera.turn(-0.03); }
        if window.is_key_down(Key::Right) { camera.turn(0.03); }
        if window.is_key_down(Key::Up) { camera.zoom = (camera.zoom * 1.02).min(10.0); }
        if window.is_key_down(Key::Down) { camera.zoom = (camera.zoom / 1.02).max(0.1); }
        for (key, algorithm) in keys.iter().zip(Algorithm::ALL) {
            if !window.is_key_pressed(*key, KeyRepeat::No) { continue; }
            match Renderer::new(algorithm, settings.render, texture.clone(), settings.default_texture) {
                Ok(r) => { renderer = r; window.set_title(&format!("Hidden Surface - {}", renderer.name())); }
                Err(e) => log::warn!("Cannot switch to {}: {}", algorithm, e),
            }
        }
        let frame = renderer.render(scene, &camera, light.as_ref());
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            if let Err(e) = frame.to_rgb_image().save("screenshot.png") { log::warn!("Screenshot failed: {}", e); }
        }
        window.update_with_buffer(&frame.to_argb_u32(), w, h)?;
    }
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(_: &Settings, _: Renderer, _: Option<Texture>, _: &Scene) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the `window` feature".into())
}
