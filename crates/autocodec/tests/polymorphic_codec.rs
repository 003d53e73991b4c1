// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! POLYMORPHIC strategy integration tests.
//!
//! Subtype codecs are registered per abstract base; the base codec writes
//! a discriminator and forwards to whichever codec matches the runtime
//! type.

use autocodec::{
    polymorphic, type_discriminator, AsAny, AutoCodec, CodecReader, CodecRegistry, CodecWriter,
    ObjectCodec, SerializationError,
};
use std::any::TypeId;
use std::sync::Arc;

#[polymorphic]
pub trait Shape: std::fmt::Debug {
    fn area(&self) -> i32;
}

#[polymorphic(codec = "TileCodec")]
pub trait Tile {
    fn corners(&self) -> usize;
}

#[derive(AutoCodec, Debug, PartialEq)]
pub struct Square {
    pub side: i32,
}

impl Shape for Square {
    fn area(&self) -> i32 {
        self.side * self.side
    }
}

impl Tile for Square {
    fn corners(&self) -> usize {
        4
    }
}

#[derive(AutoCodec, Debug, PartialEq)]
pub struct Rect {
    pub width: i32,
    pub height: i32,
    pub label: String,
}

impl Shape for Rect {
    fn area(&self) -> i32 {
        self.width * self.height
    }
}

#[derive(AutoCodec, Debug, PartialEq)]
pub struct Dot {
    pub x: i32,
}

impl Shape for Dot {
    fn area(&self) -> i32 {
        0
    }
}

fn square_as_shape(square: Square) -> Box<dyn Shape> {
    Box::new(square)
}

fn rect_as_shape(rect: Rect) -> Box<dyn Shape> {
    Box::new(rect)
}

fn shape_registry() -> Arc<CodecRegistry> {
    let registry = Arc::new(CodecRegistry::new());
    registry
        .register::<dyn Shape, _>(SquareCodec::new(), square_as_shape)
        .expect("register square");
    registry
        .register::<dyn Shape, _>(RectCodec::new(), rect_as_shape)
        .expect("register rect");
    registry
}

fn serialize_shape(codec: &ShapeCodec, shape: &Box<dyn Shape>) -> Result<Vec<u8>, SerializationError> {
    let mut writer = CodecWriter::new();
    codec.serialize(shape, None, &mut writer)?;
    Ok(writer.into_bytes())
}

#[test]
fn test_roundtrip_by_runtime_type() {
    let codec = ShapeCodec::new(shape_registry());
    let shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(Square { side: 3 }),
        Box::new(Rect {
            width: 2,
            height: 5,
            label: "door".to_string(),
        }),
    ];

    for shape in &shapes {
        let bytes = serialize_shape(&codec, shape).expect("serialize");
        let mut reader = CodecReader::new(&bytes);
        let decoded = codec.deserialize(&mut reader, None).expect("deserialize");
        assert!(reader.is_eof());
        assert_eq!(decoded.area(), shape.area());
    }

    let bytes = serialize_shape(&codec, &shapes[1]).expect("serialize");
    let decoded = codec
        .deserialize(&mut CodecReader::new(&bytes), None)
        .expect("deserialize");
    let rect = AsAny::as_any(&*decoded)
        .downcast_ref::<Rect>()
        .expect("decoded as Rect");
    assert_eq!(rect.label, "door");
}

#[test]
fn test_discriminator_prefix() {
    let codec = ShapeCodec::new(shape_registry());
    let shape: Box<dyn Shape> = Box::new(Square { side: 1 });
    let bytes = serialize_shape(&codec, &shape).expect("serialize");
    let tag = type_discriminator(SquareCodec::new().encoded_type_name());
    assert_eq!(&bytes[..4], &tag.to_le_bytes());
    assert_eq!(&bytes[4..], &[1, 0, 0, 0]);
}

#[test]
fn test_unregistered_subtype() {
    let codec = ShapeCodec::new(shape_registry());
    let dot: Box<dyn Shape> = Box::new(Dot { x: 1 });
    let err = serialize_shape(&codec, &dot).unwrap_err();
    assert!(matches!(err, SerializationError::UnregisteredType { .. }));
}

#[test]
fn test_unknown_discriminator() {
    let codec = ShapeCodec::new(shape_registry());
    let bytes = 0xFFFF_FFFF_u32.to_le_bytes();
    let err = codec
        .deserialize(&mut CodecReader::new(&bytes), None)
        .unwrap_err();
    assert!(matches!(
        err,
        SerializationError::UnknownDiscriminator { tag: 0xFFFF_FFFF, .. }
    ));
}

#[test]
fn test_registration_is_per_base() {
    let registry = shape_registry();
    let shape_codec = ShapeCodec::new(Arc::clone(&registry));
    let tile_codec = TileCodec::new(Arc::clone(&registry));

    // Square is registered for Shape only.
    let tile: Box<dyn Tile> = Box::new(Square { side: 2 });
    let mut writer = CodecWriter::new();
    let err = tile_codec.serialize(&tile, None, &mut writer).unwrap_err();
    assert!(matches!(err, SerializationError::UnregisteredType { .. }));

    let shape: Box<dyn Shape> = Box::new(Square { side: 2 });
    let bytes = serialize_shape(&shape_codec, &shape).expect("serialize");
    assert!(tile_codec
        .deserialize(&mut CodecReader::new(&bytes), None)
        .is_err());

    assert!(registry
        .lookup_codec_for::<dyn Shape>(TypeId::of::<Square>())
        .is_some_and(|name| name.ends_with("::Square")));
    assert!(registry
        .lookup_codec_for::<dyn Tile>(TypeId::of::<Square>())
        .is_none());
}

#[test]
fn test_duplicate_registration() {
    let registry = shape_registry();
    let err = registry
        .register::<dyn Shape, _>(SquareCodec::new(), square_as_shape)
        .unwrap_err();
    assert!(matches!(err, SerializationError::DuplicateRegistration { .. }));
}

// ---------------------------------------------------------------------------
// Dependency forwarded through the registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Ctx {
    pub site: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Units {
    pub scale: i32,
}

#[polymorphic(dependency = "Ctx")]
pub trait Gadget: std::fmt::Debug {
    fn id(&self) -> u32;
}

#[derive(AutoCodec, Debug, PartialEq)]
#[autocodec(constructor(name = "new", params(id, dependency(ctx: Ctx))))]
pub struct Widget {
    id: u32,
    ctx: Ctx,
}

impl Widget {
    pub fn new(id: u32, ctx: Ctx) -> Self {
        Self { id, ctx }
    }
}

impl Gadget for Widget {
    fn id(&self) -> u32 {
        self.id
    }
}

#[derive(AutoCodec, Debug, PartialEq)]
#[autocodec(constructor(name = "new", params(id, dependency(units: Units))))]
pub struct Gizmo {
    id: u32,
    units: Units,
}

impl Gizmo {
    pub fn new(id: u32, units: Units) -> Self {
        Self { id, units }
    }
}

impl Gadget for Gizmo {
    fn id(&self) -> u32 {
        self.id
    }
}

fn widget_as_gadget(widget: Widget) -> Box<dyn Gadget> {
    Box::new(widget)
}

fn gizmo_as_gadget(gizmo: Gizmo) -> Box<dyn Gadget> {
    Box::new(gizmo)
}

fn gadget_codec() -> GadgetCodec {
    let registry = Arc::new(CodecRegistry::new());
    registry
        .register::<dyn Gadget, _>(WidgetCodec::new(), widget_as_gadget)
        .expect("register widget");
    registry
        .register::<dyn Gadget, _>(GizmoCodec::new(), gizmo_as_gadget)
        .expect("register gizmo");
    GadgetCodec::new(registry)
}

#[test]
fn test_dependency_reaches_subtype_codec() {
    let codec = gadget_codec();
    let north = Ctx {
        site: "north".to_string(),
    };
    let gadget: Box<dyn Gadget> = Box::new(Widget::new(42, north.clone()));
    let mut writer = CodecWriter::new();
    codec
        .serialize(&gadget, Some(&north), &mut writer)
        .expect("serialize");
    let bytes = writer.into_bytes();
    assert_eq!(&bytes[4..], &42u32.to_le_bytes());

    let south = Ctx {
        site: "south".to_string(),
    };
    let decoded = codec
        .deserialize(&mut CodecReader::new(&bytes), Some(&south))
        .expect("deserialize");
    assert_eq!(decoded.id(), 42);
    let widget = AsAny::as_any(&*decoded)
        .downcast_ref::<Widget>()
        .expect("decoded as Widget");
    assert_eq!(widget.ctx, south);

    let err = codec
        .deserialize(&mut CodecReader::new(&bytes), None)
        .unwrap_err();
    assert!(matches!(err, SerializationError::MissingDependency { .. }));
}

#[test]
fn test_subtype_dependency_type_mismatch() {
    let codec = gadget_codec();
    let ctx = Ctx {
        site: "east".to_string(),
    };
    let gadget: Box<dyn Gadget> = Box::new(Gizmo::new(1, Units { scale: 2 }));
    let mut writer = CodecWriter::new();
    let err = codec
        .serialize(&gadget, Some(&ctx), &mut writer)
        .unwrap_err();
    assert!(matches!(err, SerializationError::DependencyMismatch { .. }));

    let tag = type_discriminator(GizmoCodec::new().encoded_type_name());
    let mut bytes = tag.to_le_bytes().to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    let err = codec
        .deserialize(&mut CodecReader::new(&bytes), Some(&ctx))
        .unwrap_err();
    assert!(matches!(err, SerializationError::DependencyMismatch { .. }));
}
