use keyrow_core::{
    device::{device_object_path, SET_KEY_ROW_METHOD},
    test_utils::MemoryDeviceManager,
    Color, DeviceManager, DeviceSession, Error, KeyPosition, MatrixDimensions,
};

const DEVICE_ID: &str = "PM1234567890";

fn init_manager() -> MemoryDeviceManager {
    let _ = env_logger::builder().is_test(true).try_init();

    MemoryDeviceManager::default().with_device(DEVICE_ID, MatrixDimensions::new(2, 3).unwrap())
}

#[test]
fn test_open_session() {
    let mut manager = init_manager();

    let session = DeviceSession::open(&mut manager, DEVICE_ID).unwrap();
    assert_eq!(session.device_id(), DEVICE_ID);
    assert_eq!(session.dimensions(), MatrixDimensions::new(2, 3).unwrap());
    assert!(session
        .lighting()
        .as_slice()
        .iter()
        .all(|color| *color == Color::BLACK));

    assert_eq!(
        DeviceSession::open(&mut manager, "unknown").map(|_| ()),
        Err(Error::DeviceNotFound)
    );
}

#[test]
fn test_draw_sends_frame_and_resets_buffer() {
    let mut manager = init_manager();

    let mut session = DeviceSession::open(&mut manager, DEVICE_ID).unwrap();
    session.set_key_light(0, Color::new(255, 0, 0)).unwrap();
    session
        .set_key_light_at(KeyPosition::new(1, 1), Color::new(0, 255, 0))
        .unwrap();
    assert_eq!(session.key_light(4), Ok(Color::new(0, 255, 0)));
    assert_eq!(
        session.set_key_light(6, Color::new(1, 1, 1)),
        Err(Error::IndexOutOfRange)
    );

    session.draw().unwrap();
    for key in 0..6 {
        assert_eq!(session.key_light(key), Ok(Color::BLACK));
    }

    assert_eq!(manager.sent_frames.len(), 1);
    assert_eq!(manager.activations, 1);
    assert_eq!(
        manager.last_frame(DEVICE_ID).unwrap(),
        &[
            0, 0, 2, 255, 0, 0, 0, 0, 0, 0, 0, 0, //
            1, 0, 2, 0, 0, 0, 0, 255, 0, 0, 0, 0,
        ]
    );
}

#[test]
fn test_failed_draw_keeps_pending_changes() {
    let mut manager = init_manager();
    manager.fail_sends = true;

    let mut session = DeviceSession::open(manager, DEVICE_ID).unwrap();
    session.set_key_light(2, Color::new(1, 2, 3)).unwrap();
    assert_eq!(session.draw(), Err(Error::Transport));
    assert_eq!(session.key_light(2), Ok(Color::new(1, 2, 3)));

    let mut manager = session.into_manager();
    assert!(manager.sent_frames.is_empty());
    assert_eq!(manager.activations, 0);

    manager.fail_sends = false;
    let mut session = DeviceSession::open(manager, DEVICE_ID).unwrap();
    session.draw().unwrap();
    assert_eq!(session.into_manager().sent_frames.len(), 1);
}

#[test]
fn test_sessions_do_not_share_buffers() {
    let mut manager = init_manager().with_device("second", MatrixDimensions::new(1, 2).unwrap());

    let mut first = DeviceSession::open(&mut manager, DEVICE_ID).unwrap();
    first.set_key_light(1, Color::new(5, 5, 5)).unwrap();
    let first_frame = keyrow_core::encode_frame(first.lighting()).unwrap();
    first.draw().unwrap();

    let mut second = DeviceSession::open(&mut manager, "second").unwrap();
    assert_eq!(second.key_light(1), Ok(Color::BLACK));
    second.draw().unwrap();

    assert_eq!(manager.last_frame(DEVICE_ID).unwrap(), first_frame.as_slice());
    assert_eq!(manager.last_frame("second").unwrap(), &[0, 0, 1, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_device_object_path() {
    assert_eq!(device_object_path(DEVICE_ID), "/org/razer/device/PM1234567890");
    assert_eq!(SET_KEY_ROW_METHOD, "setKeyRow");
}

#[derive(Default)]
struct ImmediateDaemon {
    frames: usize,
}

impl DeviceManager for ImmediateDaemon {
    fn device_matrix(&mut self, _device_id: &str) -> keyrow_core::Result<MatrixDimensions> {
        MatrixDimensions::new(1, 4)
    }

    fn send_frame(&mut self, _device_id: &str, frame: &[u8]) -> keyrow_core::Result<()> {
        assert_eq!(frame.len(), 3 + 3 * 4);
        self.frames += 1;
        Ok(())
    }
}

#[test]
fn test_draw_without_custom_frame_activation() {
    let mut session = DeviceSession::open(ImmediateDaemon::default(), DEVICE_ID).unwrap();
    session.set_key_light(3, Color::new(1, 1, 1)).unwrap();
    session.draw().unwrap();
    session.draw().unwrap();

    assert_eq!(session.key_light(3), Ok(Color::BLACK));
    assert_eq!(session.into_manager().frames, 2);
}
