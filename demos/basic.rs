//! Basic example - drive a session and print what a renderer would see.
//!
//! Run with: cargo run --example basic
//! Add RUST_LOG=debug to see the core's own logging.

use std::cell::{Cell as StdCell, RefCell};
use std::rc::Rc;

use tilegrid_core::{
    Cell, ComponentProps, Event, EventMask, Layer, LayerMutation, Position, Rgba, Session,
    SessionConfig, Size, TileBuffer,
};

const GRID: Size = Size::new(24, 6);

/// Composite visible layers bottom to top into plain text.
fn composite(session: &Session) -> String {
    let mut grid = TileBuffer::new(GRID);
    for layer in session.layers().visible() {
        for (local, cell) in layer.content().iter() {
            if cell.is_transparent() {
                continue;
            }
            grid.set(layer.position().offset(local), *cell);
        }
    }

    let mut out = String::new();
    for (at, cell) in grid.iter() {
        out.push(if cell.is_transparent() { '.' } else { cell.glyph });
        if at.x as u32 == GRID.width - 1 {
            out.push('\n');
        }
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut session = Session::new(SessionConfig::default());

    // Renderer collaborator: logs what it hears and marks itself dirty
    let dirty = Rc::new(StdCell::new(false));
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let dirty = dirty.clone();
        let log = log.clone();
        session
            .bus()
            .subscribe(EventMask::LAYER | EventMask::COMPONENT, move |event| {
                log.borrow_mut().push(format!("{:?}", event.kind()));
                dirty.set(true);
            });
    }

    // Cursor collaborator
    session.bus().subscribe(EventMask::CURSOR, |event| match event {
        Event::RequestCursorAt { position, .. } => println!("cursor -> {position:?}"),
        Event::HideCursor { .. } => println!("cursor hidden"),
        _ => {}
    });

    // Widgets
    let tree = session.tree_mut();
    let root = tree.create(ComponentProps::container(Position::ZERO, GRID));
    let ok = tree.create(ComponentProps::leaf(Position::new(2, 4), Size::new(4, 1)).focusable());
    let cancel = tree.create(ComponentProps::leaf(Position::new(8, 4), Size::new(6, 1)).focusable());
    tree.attach(root, ok)?;
    tree.attach(root, cancel)?;

    // Layers
    let background = session
        .layers_mut()
        .add_layer(Layer::with_size(Position::ZERO, GRID), 0)?;
    let overlay = session
        .layers_mut()
        .add_layer(Layer::with_size(Position::new(2, 1), Size::new(10, 3)), 1)?;

    session
        .layers_mut()
        .mutate(background, LayerMutation::Fill(Cell::glyph(' ').with_colors(Rgba::GRAY, Rgba::BLACK)))?;
    session.layers_mut().edit(overlay, |buffer| {
        buffer.write_str(Position::new(1, 1), "hello", Cell::glyph(' '));
    })?;

    // Redundant write: diffed away, no LayerChanged
    let published = session
        .layers_mut()
        .mutate(background, LayerMutation::Fill(Cell::glyph(' ').with_colors(Rgba::GRAY, Rgba::BLACK)))?;
    println!("redundant fill published: {published}");

    // Input collaborator: Tab twice, then place the cursor
    session.focus_next();
    session.focus_next();
    println!("focused: {:?}", session.focus().focused());
    session.request_cursor_at(Position::new(8, 4));
    session.hide_cursor();

    if dirty.replace(false) {
        print!("{}", composite(&session));
    }

    session.tree_mut().remove(root)?;
    println!("events: {}", log.borrow().join(", "));

    session.teardown();
    Ok(())
}
