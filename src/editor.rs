//! Single-owner editing session over a diagram.
//!
//! Every mutation recomputes the affected geometry before returning, so a
//! `route` query right after an edit always sees a consistent wire.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{Config, clamp_wire_width};
use crate::error::{DiagramError, Result};
use crate::ir::{Diagram, LabelAt, Point, PortRef, RouteAxis, RouteMode, Shape, Wire, WireStyle};
use crate::ports::port_position;
use crate::routing::geometry::{is_orthogonal, round_point, round_unit};
use crate::routing::{
    self, Handle, WireGeometry, WireRoute, derive_handles, drag_geometry, midpoint_bend, resolve_polyline,
    smart_bends,
};

static ID_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)$").unwrap());

fn id_suffix(id: &str) -> Option<u64> {
    ID_SUFFIX_RE.captures(id)?.get(1)?.as_str().parse().ok()
}

fn next_free_id(diagram: &Diagram) -> u64 {
    let shape_ids = diagram.shapes.iter().map(|shape| shape.id.as_str());
    let port_ids = diagram
        .shapes
        .iter()
        .flat_map(|shape| shape.ports.iter().map(|port| port.id.as_str()));
    let wire_ids = diagram.wires.iter().map(|wire| wire.id.as_str());
    shape_ids
        .chain(port_ids)
        .chain(wire_ids)
        .filter_map(id_suffix)
        .max()
        .map_or(1, |max| max + 1)
}

/// A handle drag in progress, from pointer-down to pointer-up.
///
/// Holds the wire geometry as it was when the drag began; every pointer move
/// is applied to that snapshot, not to the previous move's result.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub wire_id: String,
    pub handle: Handle,
    origin: WireGeometry,
    pointer_start: Point,
    start: Point,
    end: Point,
}

#[derive(Debug)]
pub struct Editor {
    diagram: Diagram,
    config: Config,
    next_id: u64,
    drag: Option<DragSession>,
}

impl Editor {
    pub fn new(diagram: Diagram, config: Config) -> Self {
        let next_id = next_free_id(&diagram);
        Self {
            diagram,
            config,
            next_id,
            drag: None,
        }
    }

    pub fn from_json(input: &str, config: Config) -> Result<Self> {
        Ok(Self::new(Diagram::from_json(input)?, config))
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn to_json(&self) -> Result<String> {
        self.diagram.to_json()
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.diagram.shape(id).is_some() || self.diagram.wire(id).is_some()
    }

    fn wire(&self, wire_id: &str) -> Result<&Wire> {
        self.diagram
            .wire(wire_id)
            .ok_or_else(|| DiagramError::UnknownWire(wire_id.to_string()))
    }

    fn wire_mut(&mut self, wire_id: &str) -> Result<&mut Wire> {
        self.diagram
            .wire_mut(wire_id)
            .ok_or_else(|| DiagramError::UnknownWire(wire_id.to_string()))
    }

    fn resolve(&self, port_ref: &PortRef) -> Result<Point> {
        let shape = self
            .diagram
            .shape(&port_ref.shape_id)
            .ok_or_else(|| DiagramError::UnknownShape(port_ref.shape_id.clone()))?;
        let port = shape.port(&port_ref.port_id).ok_or_else(|| DiagramError::UnknownPort {
            shape: port_ref.shape_id.clone(),
            port: port_ref.port_id.clone(),
        })?;
        Ok(port_position(shape, port))
    }

    fn wire_endpoints(&self, wire_id: &str) -> Result<(Point, Point)> {
        let wire = self.wire(wire_id)?;
        Ok((self.resolve(&wire.from)?, self.resolve(&wire.to)?))
    }

    /// Adds a shape; empty shape or port ids get fresh ones.
    pub fn add_shape(&mut self, mut shape: Shape) -> Result<String> {
        if shape.id.is_empty() {
            shape.id = self.allocate_id("mod");
        }
        for port in &mut shape.ports {
            if port.id.is_empty() {
                port.id = self.allocate_id("port");
            }
        }
        if self.id_in_use(&shape.id) {
            return Err(DiagramError::DuplicateId(shape.id));
        }
        if let Some(suffix) = id_suffix(&shape.id) {
            self.next_id = self.next_id.max(suffix + 1);
        }
        let id = shape.id.clone();
        self.diagram.shapes.push(shape);
        Ok(id)
    }

    /// Creates a horizontal-first wire between two ports with its bend at the
    /// midpoint. The wire is not smart-routed.
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<String> {
        let start = self.resolve(&from)?;
        let end = self.resolve(&to)?;
        let id = self.allocate_id("wire");
        let defaults = &self.config.wire;
        let mut wire = Wire::new(id.clone(), from, to);
        wire.color = defaults.color.clone();
        wire.width = clamp_wire_width(defaults.width);
        wire.style = defaults.style;
        wire.label_at = defaults.label_at;
        wire.bend = midpoint_bend(wire.route, start, end);
        crate::log::debug!(wire = %id, bend = wire.bend, "connected");
        self.diagram.wires.push(wire);
        Ok(id)
    }

    /// Drops any detour and puts the bend back at the midpoint between the
    /// current endpoint positions.
    pub fn reset_simple_route(&mut self, wire_id: &str) -> Result<()> {
        let (start, end) = self.wire_endpoints(wire_id)?;
        let wire = self.wire_mut(wire_id)?;
        wire.bends = None;
        wire.bend = midpoint_bend(wire.route, start, end);
        self.cancel_drag_if(|id| id == wire_id);
        Ok(())
    }

    pub fn set_route_axis(&mut self, wire_id: &str, axis: RouteAxis) -> Result<()> {
        self.wire_mut(wire_id)?.route = axis;
        self.reset_simple_route(wire_id)
    }

    /// Resets the wire, then replaces its route with a detour if the simple
    /// route collides. Returns the mode the wire ends up in.
    pub fn recompute_smart_route(&mut self, wire_id: &str) -> Result<RouteMode> {
        self.reset_simple_route(wire_id)?;
        let (start, end) = self.wire_endpoints(wire_id)?;
        let wire = self.wire(wire_id)?;
        let bends = smart_bends(wire, start, end, &self.diagram.shapes, self.config.routing.margin);
        let wire = self.wire_mut(wire_id)?;
        wire.bends = bends;
        Ok(wire.mode())
    }

    /// Moves one stored detour point. Returns `Ok(false)` and leaves the wire
    /// alone if the move would make a segment diagonal.
    pub fn set_bend_point(&mut self, wire_id: &str, index: usize, point: Point) -> Result<bool> {
        let (start, end) = self.wire_endpoints(wire_id)?;
        let wire = self.wire_mut(wire_id)?;
        let missing = || DiagramError::NoBendPoint {
            wire: wire_id.to_string(),
            index,
        };
        let mut bends = wire.detour().ok_or_else(missing)?.to_vec();
        *bends.get_mut(index).ok_or_else(missing)? = round_point(point);

        let path = std::iter::once(start)
            .chain(bends.iter().copied())
            .chain(std::iter::once(end))
            .collect::<Vec<_>>();
        if !path.windows(2).all(|s| is_orthogonal(s[0], s[1])) {
            return Ok(false);
        }
        wire.bends = Some(bends);
        self.cancel_drag_if(|id| id == wire_id);
        Ok(true)
    }

    pub fn set_label(&mut self, wire_id: &str, label: impl Into<String>) -> Result<()> {
        self.wire_mut(wire_id)?.label = label.into();
        Ok(())
    }

    pub fn set_label_at(&mut self, wire_id: &str, at: LabelAt) -> Result<()> {
        self.wire_mut(wire_id)?.label_at = at;
        Ok(())
    }

    pub fn set_color(&mut self, wire_id: &str, color: impl Into<String>) -> Result<()> {
        self.wire_mut(wire_id)?.color = color.into();
        Ok(())
    }

    pub fn set_width(&mut self, wire_id: &str, width: f32) -> Result<()> {
        self.wire_mut(wire_id)?.width = clamp_wire_width(width);
        Ok(())
    }

    pub fn set_style(&mut self, wire_id: &str, style: WireStyle) -> Result<()> {
        self.wire_mut(wire_id)?.style = style;
        Ok(())
    }

    /// Moves a shape to a whole-unit position. Detours on attached wires are
    /// kept as they are until the wire is reset or re-routed.
    pub fn move_shape(&mut self, shape_id: &str, x: f32, y: f32) -> Result<()> {
        let shape = self
            .diagram
            .shape_mut(shape_id)
            .ok_or_else(|| DiagramError::UnknownShape(shape_id.to_string()))?;
        shape.x = round_unit(x);
        shape.y = round_unit(y);
        let attached = self
            .diagram
            .wires
            .iter()
            .filter(|wire| wire.touches_shape(shape_id))
            .map(|wire| wire.id.clone())
            .collect::<Vec<_>>();
        self.cancel_drag_if(|wire_id| attached.iter().any(|id| id == wire_id));
        Ok(())
    }

    /// Removes wires matching `doomed`, returning their ids.
    fn drop_wires(&mut self, doomed: impl Fn(&Wire) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.diagram.wires.retain(|wire| {
            if doomed(wire) {
                removed.push(wire.id.clone());
                false
            } else {
                true
            }
        });
        self.cancel_drag_if(|wire_id| removed.iter().any(|id| id == wire_id));
        removed
    }

    /// Drops the drag session if `stale` holds for its wire. A session's
    /// snapshot is only valid while nothing else edits that wire's route or
    /// moves its endpoints.
    fn cancel_drag_if(&mut self, stale: impl Fn(&str) -> bool) {
        if self.drag.as_ref().is_some_and(|session| stale(&session.wire_id)) {
            self.drag = None;
            crate::log::debug!("drag session cancelled");
        }
    }

    /// Removes a shape and every wire attached to it.
    pub fn remove_shape(&mut self, shape_id: &str) -> Result<Vec<String>> {
        let index = self
            .diagram
            .shapes
            .iter()
            .position(|shape| shape.id == shape_id)
            .ok_or_else(|| DiagramError::UnknownShape(shape_id.to_string()))?;
        self.diagram.shapes.remove(index);
        Ok(self.drop_wires(|wire| wire.touches_shape(shape_id)))
    }

    /// Removes a port and every wire attached to it.
    pub fn remove_port(&mut self, shape_id: &str, port_id: &str) -> Result<Vec<String>> {
        let shape = self
            .diagram
            .shape_mut(shape_id)
            .ok_or_else(|| DiagramError::UnknownShape(shape_id.to_string()))?;
        let index = shape
            .ports
            .iter()
            .position(|port| port.id == port_id)
            .ok_or_else(|| DiagramError::UnknownPort {
                shape: shape_id.to_string(),
                port: port_id.to_string(),
            })?;
        shape.ports.remove(index);
        Ok(self.drop_wires(|wire| wire.touches_port(shape_id, port_id)))
    }

    pub fn delete_wire(&mut self, wire_id: &str) -> Result<()> {
        self.wire(wire_id)?;
        self.drop_wires(|wire| wire.id == wire_id);
        Ok(())
    }

    /// Starts dragging the `handle_index`-th handle of a wire. Replaces any
    /// session already in progress.
    pub fn begin_wire_drag(&mut self, wire_id: &str, handle_index: usize, pointer: Point) -> Result<()> {
        let (start, end) = self.wire_endpoints(wire_id)?;
        let wire = self.wire(wire_id)?;
        let points = resolve_polyline(wire, start, end);
        let handle = derive_handles(wire, &points)
            .get(handle_index)
            .copied()
            .ok_or_else(|| DiagramError::NoHandle {
                wire: wire_id.to_string(),
                index: handle_index,
            })?;
        crate::log::debug!(wire = %wire_id, segment = handle.segment_index, "drag start");
        self.drag = Some(DragSession {
            wire_id: wire_id.to_string(),
            handle,
            origin: WireGeometry::of(wire),
            pointer_start: pointer,
            start,
            end,
        });
        Ok(())
    }

    /// Applies the pointer's offset from the drag start to the snapshot and
    /// commits it. Returns `false` if there is no session or the move was
    /// refused.
    pub fn drag_wire_to(&mut self, pointer: Point) -> bool {
        let Some(session) = self.drag.as_ref() else {
            return false;
        };
        let Some(wire) = self.diagram.wire_mut(&session.wire_id) else {
            return false;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        match drag_geometry(&session.origin, wire.route, &session.handle, dx, dy, session.start, session.end) {
            Some(moved) => {
                crate::log::debug!(wire = %wire.id, dx, dy, "drag commit");
                moved.commit(wire);
                true
            }
            None => false,
        }
    }

    pub fn end_wire_drag(&mut self) -> Option<DragSession> {
        let session = self.drag.take();
        if let Some(session) = &session {
            crate::log::debug!(wire = %session.wire_id, "drag end");
        }
        session
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn route(&self, wire_id: &str) -> Option<WireRoute> {
        let wire = self.diagram.wire(wire_id)?;
        routing::route_wire(&self.diagram, wire, &self.config)
    }

    pub fn routes(&self) -> Vec<WireRoute> {
        routing::route_all(&self.diagram, &self.config)
    }

    fn wire_ids(&self) -> Vec<String> {
        self.diagram.wires.iter().map(|wire| wire.id.clone()).collect()
    }

    /// Resets every routable wire; returns how many were reset.
    pub fn reset_all_routes(&mut self) -> usize {
        let mut count = 0;
        for id in self.wire_ids() {
            match self.reset_simple_route(&id) {
                Ok(()) => count += 1,
                Err(_err) => {
                    crate::log::warn!(wire = %id, error = %_err, "reset skipped");
                }
            }
        }
        count
    }

    /// Smart-routes every routable wire; returns how many ended up detoured.
    pub fn recompute_all_smart_routes(&mut self) -> usize {
        let mut detoured = 0;
        for id in self.wire_ids() {
            match self.recompute_smart_route(&id) {
                Ok(RouteMode::Detour) => detoured += 1,
                Ok(RouteMode::Simple) => {}
                Err(_err) => {
                    crate::log::warn!(wire = %id, error = %_err, "smart route skipped");
                }
            }
        }
        detoured
    }
}
