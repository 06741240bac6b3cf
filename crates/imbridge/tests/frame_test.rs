//! Per-frame behavior of the bridge: input reaching the GUI library, draw
//! lists reaching GL, and the host's GL state surviving the UI pass.

use imbridge::*;
use proptest::prelude::*;

type TestBridge = ImGuiBridge<HeadlessGl, HeadlessWindow, ScriptedGui>;

fn bridge_with_window(window: HeadlessWindow) -> TestBridge {
    ImGuiBridge::initialize_with_clipboard(
        HeadlessGl::with_viewport(800, 600),
        window,
        ScriptedGui::new().with_font_atlas(64, 64),
        BridgeOptions::default(),
        None,
    )
    .unwrap()
}

fn bridge() -> TestBridge {
    bridge_with_window(HeadlessWindow::new().with_size(800.0, 600.0))
}

fn quad(clip: [f32; 4], texture_id: TextureId) -> DrawList {
    DrawList {
        vtx_buffer: vec![
            DrawVert::new([0.0, 0.0], [0.0, 0.0], [255; 4]),
            DrawVert::new([100.0, 0.0], [1.0, 0.0], [255; 4]),
            DrawVert::new([100.0, 100.0], [1.0, 1.0], [255; 4]),
            DrawVert::new([0.0, 100.0], [0.0, 1.0], [255; 4]),
        ],
        idx_buffer: vec![0, 1, 2, 0, 2, 3],
        commands: vec![DrawCmd::Elements {
            count: 6,
            params: DrawCmdParams {
                clip_rect: ClipRect::from_array(clip),
                texture_id,
                vtx_offset: 0,
                idx_offset: 0,
            },
        }],
    }
}

fn frame(lists: Vec<DrawList>) -> DrawData {
    DrawData {
        display_size: Vec2::new(800.0, 600.0),
        draw_lists: lists,
        ..DrawData::default()
    }
}

/// Puts the GL context into a state no UI pass would leave behind.
fn dirty_host_state(gl: &HeadlessGl) {
    gl.enable(glow::BLEND);
    gl.enable(glow::DEPTH_TEST);
    gl.enable(glow::CULL_FACE);
    gl.enable(glow::STENCIL_TEST);
    gl.enable(glow::PRIMITIVE_RESTART);
    gl.disable(glow::SCISSOR_TEST);
    gl.viewport(10, 10, 200, 150);
    gl.scissor(0, 0, 50, 50);
    gl.blend_equation_separate(glow::FUNC_SUBTRACT, glow::MAX);
    gl.blend_func_separate(glow::ONE, glow::ZERO, glow::DST_COLOR, glow::SRC_COLOR);
    gl.polygon_mode(glow::FRONT_AND_BACK, glow::LINE);
    gl.active_texture(glow::TEXTURE0);
    gl.bind_texture(glow::TEXTURE_2D, 40);
    gl.bind_sampler(0, 44);
    gl.active_texture(glow::TEXTURE3);
    gl.use_program(41);
    gl.bind_vertex_array(42);
    gl.bind_buffer(glow::ARRAY_BUFFER, 43);
}

#[test]
fn test_events_reach_the_gui_on_next_frame() {
    let mut bridge = bridge();
    bridge.window_mut().move_pointer(Some(Vec2::new(30.0, 40.0)));
    bridge.handle_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
    });
    bridge.handle_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    });
    bridge.handle_event(InputEvent::Scroll { dx: 0.0, dy: 2.0 });
    bridge.handle_event(InputEvent::Key {
        key: Key::LeftCtrl,
        pressed: true,
    });
    for ch in "ok".chars() {
        bridge.handle_event(InputEvent::Text(ch));
    }

    bridge.begin_frame().unwrap();

    let seen = bridge.gui().last_input().unwrap();
    assert!(seen.is_mouse_down(MouseButton::Left));
    assert_eq!(seen.mouse_pos, Vec2::new(30.0, 40.0));
    assert!((seen.mouse_wheel - 2.0).abs() < f32::EPSILON);
    assert!(seen.key_ctrl());
    assert_eq!(seen.display_size, Vec2::new(800.0, 600.0));
    assert_eq!(bridge.gui().received_text(), "ok");

    // Consumed by the GUI library, never cleared by the bridge.
    assert!(bridge.input().mouse_wheel.abs() < f32::EPSILON);
    assert!(bridge.input().input_characters().is_empty());
}

#[test]
fn test_empty_frame_makes_no_gl_calls() {
    let mut bridge = bridge();
    bridge.begin_frame().unwrap();
    bridge.gl().clear_calls();

    bridge.end_frame().unwrap();

    assert_eq!(bridge.gl().call_count(), 0);
}

#[test]
fn test_visible_quad_is_drawn_with_font_texture() {
    let mut bridge = bridge();
    let font = bridge.renderer().font_texture();
    bridge
        .gui_mut()
        .queue_frame(frame(vec![quad([0.0, 0.0, 100.0, 100.0], font)]));

    bridge.begin_frame().unwrap();
    bridge.end_frame().unwrap();

    let draws = bridge.gl().draw_calls();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].count, 6);
    assert_eq!(u64::from(draws[0].texture), font.id());
    assert_eq!(draws[0].scissor_box, [0, 500, 100, 100]);
    assert!(draws[0].blend);
    assert!(draws[0].scissor_test);
}

#[test]
fn test_offscreen_quad_is_culled() {
    let mut bridge = bridge();
    let font = bridge.renderer().font_texture();
    bridge.gui_mut().queue_frame(frame(vec![
        quad([900.0, 0.0, 1000.0, 100.0], font),
        quad([0.0, 700.0, 100.0, 800.0], font),
        quad([50.0, 50.0, 50.0, 80.0], font),
    ]));

    bridge.begin_frame().unwrap();
    bridge.end_frame().unwrap();

    assert!(bridge.gl().draw_calls().is_empty());
}

#[test]
fn test_host_gl_state_survives_ui_pass() {
    let mut bridge = bridge();
    let font = bridge.renderer().font_texture();
    bridge
        .gui_mut()
        .queue_frame(frame(vec![quad([0.0, 0.0, 400.0, 300.0], font)]));
    dirty_host_state(bridge.gl());
    let before = GlStateSnapshot::capture(bridge.gl());

    bridge.begin_frame().unwrap();
    bridge.end_frame().unwrap();

    assert_eq!(bridge.gl().draw_calls().len(), 1);
    assert_eq!(GlStateSnapshot::capture(bridge.gl()), before);
    assert_eq!(before.viewport, [10, 10, 200, 150]);
    assert_eq!(before.scissor_box, [0, 0, 50, 50]);
    assert!(before.blend);
    assert!(before.stencil_test);
    assert!(before.primitive_restart);
    assert_eq!(before.sampler, 44);
}

#[test]
fn test_user_callback_fails_frame_but_restores_state() {
    let mut bridge = bridge();
    let font = bridge.renderer().font_texture();
    let mut list = quad([0.0, 0.0, 100.0, 100.0], font);
    list.commands.push(DrawCmd::UserCallback(UserCallbackId(7)));
    bridge.gui_mut().queue_frame(frame(vec![list]));
    dirty_host_state(bridge.gl());
    let before = GlStateSnapshot::capture(bridge.gl());

    bridge.begin_frame().unwrap();
    let err = bridge.end_frame().unwrap_err();

    assert!(err.to_string().contains("not supported"));
    assert_eq!(GlStateSnapshot::capture(bridge.gl()), before);
    assert_eq!(bridge.gl().live_vertex_arrays(), 0);
    // The frame is over even though it failed.
    assert!(!bridge.in_frame());
    bridge.begin_frame().unwrap();
}

#[test]
fn test_no_cursor_hides_platform_cursor() {
    let mut bridge = bridge();
    bridge.gui_mut().set_mouse_cursor(None);

    bridge.begin_frame().unwrap();

    assert_eq!(bridge.window().cursor_mode(), CursorMode::Hidden);
}

#[test]
fn test_unmapped_cursor_falls_back_to_arrow() {
    let window = HeadlessWindow::new()
        .with_supported_cursors(&[MouseCursor::Arrow, MouseCursor::TextInput]);
    let mut bridge = bridge_with_window(window);
    bridge.gui_mut().set_mouse_cursor(Some(MouseCursor::ResizeNWSE));

    bridge.begin_frame().unwrap();

    assert_eq!(bridge.window().current_cursor(), Some(MouseCursor::Arrow));
    assert_eq!(bridge.window().cursor_mode(), CursorMode::Normal);
}

#[test]
fn test_gui_drawn_cursor_hides_platform_cursor_next_frame() {
    let mut bridge = bridge();
    bridge.gui_mut().set_draw_own_cursor(true);

    bridge.begin_frame().unwrap();
    assert_eq!(bridge.window().cursor_mode(), CursorMode::Normal);
    bridge.end_frame().unwrap();

    bridge.begin_frame().unwrap();
    assert_eq!(bridge.window().cursor_mode(), CursorMode::Hidden);
}

#[test]
fn test_requested_mouse_move_warps_pointer() {
    let mut bridge = bridge();
    bridge.gui_mut().request_mouse_pos(Vec2::new(120.0, 80.0));

    bridge.begin_frame().unwrap();
    bridge.end_frame().unwrap();
    bridge.begin_frame().unwrap();

    assert_eq!(bridge.window().warps(), &[Vec2::new(120.0, 80.0)]);
}

#[test]
fn test_delta_time_follows_window_clock() {
    let mut bridge = bridge();
    bridge.begin_frame().unwrap();
    bridge.end_frame().unwrap();

    bridge.window_mut().advance_time(0.05);
    bridge.begin_frame().unwrap();

    assert!((bridge.input().delta_time - 0.05).abs() < 1e-6);
}

proptest! {
    #[test]
    fn prop_host_viewport_and_scissor_survive(
        viewport in (0i32..100, 0i32..100, 1i32..2000, 1i32..2000),
        scissor in (0i32..100, 0i32..100, 1i32..2000, 1i32..2000),
        blend in any::<bool>(),
        scissor_test in any::<bool>(),
    ) {
        let mut bridge = bridge();
        let font = bridge.renderer().font_texture();
        bridge.gui_mut().queue_frame(frame(vec![quad([0.0, 0.0, 800.0, 600.0], font)]));
        {
            let gl = bridge.gl();
            gl.viewport(viewport.0, viewport.1, viewport.2, viewport.3);
            gl.scissor(scissor.0, scissor.1, scissor.2, scissor.3);
            if blend { gl.enable(glow::BLEND) } else { gl.disable(glow::BLEND) }
            if scissor_test { gl.enable(glow::SCISSOR_TEST) } else { gl.disable(glow::SCISSOR_TEST) }
        }
        let before = GlStateSnapshot::capture(bridge.gl());

        bridge.begin_frame().unwrap();
        bridge.end_frame().unwrap();

        prop_assert_eq!(GlStateSnapshot::capture(bridge.gl()), before);
    }
}
