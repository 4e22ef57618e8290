use overlay::{
    DisplaySurface,
    ImguiSurface,
    PrimitiveRenderer,
    TextStyle,
};

#[test]
fn renders_primitives_into_draw_list() {
    let mut imgui = imgui::Context::create();
    imgui.set_ini_filename(None);
    imgui.io_mut().display_size = [1280.0, 720.0];
    imgui.fonts().build_rgba32_texture();

    let renderer = PrimitiveRenderer::default();
    {
        let ui = imgui.new_frame();
        let draw = ui.get_foreground_draw_list();
        let mut surface = ImguiSurface::new(ui, &draw);

        assert_eq!(surface.resolution(), [1280.0, 720.0]);
        renderer
            .draw_box(&mut surface, 100.0, 100.0, 50.0, 120.0, [0.0, 1.0, 0.0, 1.0], 1.0)
            .unwrap();
        renderer
            .draw_label(&mut surface, [125.0, 240.0], "alpha [10.0m]", true)
            .unwrap();

        let text_size = surface.measure_text("alpha", renderer.text_style());
        assert!(text_size[0] > 0.0 && text_size[1] > 0.0);
    }

    let draw_data = imgui.render();
    assert!(draw_data.total_vtx_count > 0);
}

#[test]
fn text_is_measured_at_the_drawn_size() {
    let mut imgui = imgui::Context::create();
    imgui.set_ini_filename(None);
    imgui.io_mut().display_size = [1280.0, 720.0];
    imgui.fonts().build_rgba32_texture();

    let style = TextStyle {
        scale: 2.0,
        ..TextStyle::default()
    };
    {
        let ui = imgui.new_frame();
        let draw = ui.get_foreground_draw_list();
        let surface = ImguiSurface::new(ui, &draw);

        assert_eq!(
            surface.measure_text("alpha [10.0m]", &style),
            ui.calc_text_size("alpha [10.0m]")
        );
    }
    imgui.render();
}
