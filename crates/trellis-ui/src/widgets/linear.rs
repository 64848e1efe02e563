//! Shared measure logic for `Row` and `Column`.

use std::rc::Rc;

use trellis_foundation::LayoutWidget;
use trellis_ui_graphics::CallOp;
use trellis_ui_layout::{
    Arrangement, Axis, Constraints, Dimensions, LayoutContext, LinearArrangement,
};

use crate::coordinator::NodeCoordinator;
use crate::modifier_nodes::{WeightElement, WEIGHT_KEY};

/// Offset of a child along the cross axis, given the available and the
/// child's cross size.
pub(crate) type CrossAlign = Rc<dyn Fn(i32, i32) -> i32>;

fn axis_constraints(axis: Axis, main: (i32, i32), cross: (i32, i32)) -> Constraints {
    Constraints::new(axis.point(main.0, cross.0), axis.point(main.1, cross.1))
}

/// Lays children out along `axis`.
///
/// Unweighted children are measured first with the space left by their
/// predecessors; the rest of the main axis is split between weighted
/// children in proportion to their weights.
pub(crate) fn linear_widget(
    axis: Axis,
    arrangement: LinearArrangement,
    cross_align: CrossAlign,
    children: Vec<Rc<NodeCoordinator>>,
) -> LayoutWidget {
    Rc::new(move |gtx: &mut LayoutContext| {
        let constraints = gtx.constraints;
        let main_max = axis.main(constraints.max);
        let main_min = axis.main(constraints.min);
        let cross_max = axis.cross(constraints.max);
        let cross_min = axis.cross(constraints.min);

        let weights: Vec<Option<WeightElement>> = children
            .iter()
            .map(|child| child.parent_data::<WeightElement>(WEIGHT_KEY))
            .collect();
        let total_weight: f32 = weights.iter().flatten().map(|weight| weight.weight).sum();
        let spacing = arrangement.fixed_spacing(children.len());

        let mut measured: Vec<Option<(Dimensions, CallOp)>> = vec![None; children.len()];
        let mut used = spacing;
        for (index, child) in children.iter().enumerate() {
            if weights[index].is_some() {
                continue;
            }
            let available = (main_max - used).max(0);
            let child_constraints = axis_constraints(axis, (0, available), (0, cross_max));
            let (dims, call) = child.measure(gtx, child_constraints);
            used += axis.main(dims.size);
            measured[index] = Some((dims, call));
        }

        let mut fill_main = false;
        if total_weight > 0.0 {
            let remaining = (main_max - used).max(0);
            let mut handed_out = 0;
            let mut weight_seen = 0.0;
            for (index, child) in children.iter().enumerate() {
                let Some(weight) = weights[index] else {
                    continue;
                };
                weight_seen += weight.weight;
                // Cumulative rounding hands the remainder to the last weighted child.
                let upto = ((remaining as f32) * weight_seen / total_weight).round() as i32;
                let share = (upto - handed_out).max(0);
                handed_out = upto;
                let main_range = if weight.fill { (share, share) } else { (0, share) };
                fill_main |= weight.fill;
                let child_constraints = axis_constraints(axis, main_range, (0, cross_max));
                let (dims, call) = child.measure(gtx, child_constraints);
                used += axis.main(dims.size);
                measured[index] = Some((dims, call));
            }
        }

        let placed: Vec<(Dimensions, CallOp)> = measured.into_iter().flatten().collect();
        let content_cross = placed
            .iter()
            .map(|(dims, _)| axis.cross(dims.size))
            .max()
            .unwrap_or(0);
        let main = if fill_main { main_max } else { used.max(main_min) };
        let size = constraints.constrain(axis.point(main, content_cross.max(cross_min)));
        let main = axis.main(size);
        let cross = axis.cross(size);

        let sizes: Vec<i32> = placed.iter().map(|(dims, _)| axis.main(dims.size)).collect();
        let mut positions = vec![0; sizes.len()];
        arrangement.arrange(main, &sizes, &mut positions);

        let mut baseline = 0;
        for ((dims, call), position) in placed.iter().zip(positions) {
            let cross_offset = cross_align(cross, axis.cross(dims.size));
            let offset = axis.point(position, cross_offset);
            if baseline == 0 && dims.baseline > 0 {
                baseline = size.y - (offset.y + dims.size.y) + dims.baseline;
            }
            gtx.ops.add_at(call, offset);
        }

        Dimensions { size, baseline }
    })
}
