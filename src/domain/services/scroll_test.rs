use super::Scroll;

fn scroll(list_length: u16, viewport_length: u16) -> Scroll {
    let mut scroll = Scroll::default();
    scroll.set_state(list_length, viewport_length);
    return scroll;
}

#[test]
fn it_stays_put_when_everything_fits() {
    let mut scroll = scroll(5, 10);
    scroll.down();
    scroll.down_page();
    scroll.last();

    assert_eq!(scroll.position, 0);
    assert!(scroll.is_at_bottom());
}

#[test]
fn it_clamps_to_the_last_page() {
    let mut scroll = scroll(30, 10);
    for _ in 0..50 {
        scroll.down();
    }

    assert_eq!(scroll.position, 20);
    assert!(scroll.is_at_bottom());
}

#[test]
fn it_pages_by_viewport() {
    let mut scroll = scroll(30, 10);
    scroll.down_page();
    assert_eq!(scroll.position, 9);

    scroll.up_page();
    scroll.up_page();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_jumps_to_last_and_back() {
    let mut scroll = scroll(30, 10);
    scroll.last();
    assert_eq!(scroll.position, 20);

    scroll.reset();
    assert_eq!(scroll.position, 0);
    assert!(!scroll.is_at_bottom());
}

#[test]
fn it_clamps_when_the_history_shrinks() {
    let mut scroll = scroll(30, 10);
    scroll.last();
    scroll.set_state(12, 10);

    assert_eq!(scroll.position, 2);
}
